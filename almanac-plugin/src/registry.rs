//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use almanac_core::{codes, AlmanacError, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Central function registry, immutable once built
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self { functions: HashMap::new() }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    /// Case-insensitive lookup
    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                debug!(function = name, args = args.len(), "dispatching call");
                match f.call(args, ctx) {
                    Value::Error(e) if e.context.as_ref().and_then(|c| c.function.as_ref()).is_none() => {
                        Value::Error(e.in_function(f.meta().name))
                    }
                    other => other,
                }
            }
            None => {
                warn!(function = name, "call to unknown function");
                // Find similar function names for better error message
                let similar = self.find_similar_functions(name);
                let mut err = AlmanacError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Find registered names similar to the given name, best first
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self
            .functions
            .values()
            .filter_map(|f| {
                let display = f.meta().name;
                let score = Self::similarity_score(&name_lower, &display.to_lowercase());
                if score > 0 {
                    Some((display.to_string(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for a stable order
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Shared characters
        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        score += query_chars.intersection(&candidate_chars).count() * 2;

        // Prefer similar lengths
        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Value::Object(Self::function_to_help(f.meta())),
            None => Value::Error(
                AlmanacError::new(codes::NOT_FOUND, format!("No function named '{}'", name))
                    .with_suggestion("Call help() for the list of functions"),
            ),
        }
    }

    fn general_help(&self) -> Value {
        let mut help = HashMap::new();

        let mut funcs_by_cat: HashMap<String, Vec<String>> = HashMap::new();
        for f in self.functions.values() {
            let meta = f.meta();
            funcs_by_cat.entry(meta.category.to_string()).or_default().push(meta.name.to_string());
        }
        help.insert(
            "functions".to_string(),
            Value::Object(
                funcs_by_cat
                    .into_iter()
                    .map(|(k, mut v)| {
                        v.sort();
                        (k, Value::List(v.into_iter().map(Value::Text).collect()))
                    })
                    .collect(),
            ),
        );
        help.insert(
            "usage".to_string(),
            Value::Text("Call help('function_name') for detailed help.".to_string()),
        );

        Value::Object(help)
    }

    fn function_to_help(meta: FunctionMeta) -> HashMap<String, Value> {
        let mut help = HashMap::new();
        help.insert("name".to_string(), Value::Text(meta.name.to_string()));
        help.insert("description".to_string(), Value::Text(meta.description.to_string()));
        help.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
        help.insert("returns".to_string(), Value::Text(meta.returns.to_string()));
        help.insert("category".to_string(), Value::Text(meta.category.to_string()));
        help.insert(
            "args".to_string(),
            Value::List(
                meta.args
                    .iter()
                    .map(|a| {
                        let mut arg = HashMap::new();
                        arg.insert("name".to_string(), Value::Text(a.name.to_string()));
                        arg.insert("type".to_string(), Value::Text(a.typ.to_string()));
                        arg.insert("description".to_string(), Value::Text(a.description.to_string()));
                        arg.insert("optional".to_string(), Value::Bool(a.optional));
                        if let Some(default) = a.default {
                            arg.insert("default".to_string(), Value::Text(default.to_string()));
                        }
                        Value::Object(arg)
                    })
                    .collect(),
            ),
        );
        help.insert(
            "examples".to_string(),
            Value::List(meta.examples.iter().map(|e| Value::Text(e.to_string())).collect()),
        );
        help.insert(
            "related".to_string(),
            Value::List(meta.related.iter().map(|r| Value::Text(r.to_string())).collect()),
        );
        help
    }

    /// Functions sorted by name, optionally restricted to one category
    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let mut metas: Vec<FunctionMeta> = self
            .functions
            .values()
            .map(|f| f.meta())
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect();
        metas.sort_by_key(|m| m.name);

        let funcs = metas
            .into_iter()
            .map(|meta| {
                let mut obj = HashMap::new();
                obj.insert("name".to_string(), Value::Text(meta.name.to_string()));
                obj.insert("description".to_string(), Value::Text(meta.description.to_string()));
                obj.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
                obj.insert("category".to_string(), Value::Text(meta.category.to_string()));
                Value::Object(obj)
            })
            .collect();
        Value::List(funcs)
    }

    /// Full metadata of every function as JSON, sorted by name
    pub fn catalog(&self) -> serde_json::Value {
        let mut metas: Vec<FunctionMeta> = self.functions.values().map(|f| f.meta()).collect();
        metas.sort_by_key(|m| m.name);
        serde_json::to_value(metas).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Echo;

    static ECHO_ARGS: [ArgMeta; 1] = [ArgMeta::required("value", "Any", "Value to return")];

    impl FunctionPlugin for Echo {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta {
                name: "echoValue",
                description: "Returns its argument",
                usage: "echoValue(value)",
                args: &ECHO_ARGS,
                returns: "Any",
                examples: &["echoValue(1)"],
                category: "test",
                related: &[],
            }
        }

        fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
            match args.first() {
                Some(v) => v.clone(),
                None => Value::Error(AlmanacError::arg_count("echoValue", 1, 0)),
            }
        }
    }

    fn registry() -> PluginRegistry {
        PluginRegistry::new().with_function(Echo)
    }

    #[test]
    fn test_call_is_case_insensitive() {
        let ctx = EvalContext::new();
        assert_eq!(registry().call_function("ECHOVALUE", &[Value::Integer(7)], &ctx), Value::Integer(7));
    }

    #[test]
    fn test_errors_get_function_context() {
        let ctx = EvalContext::new();
        let result = registry().call_function("echoValue", &[], &ctx);
        let err = result.as_error().unwrap();
        assert!(err.is(codes::ARG_COUNT));
        assert_eq!(err.context.as_ref().unwrap().function.as_deref(), Some("echoValue"));
    }

    #[test]
    fn test_unknown_function_suggests() {
        let ctx = EvalContext::new();
        let result = registry().call_function("echo", &[], &ctx);
        let err = result.as_error().unwrap();
        assert!(err.is(codes::UNDEFINED_FUNC));
        assert!(err.suggestion.as_ref().unwrap().contains("echoValue"));
    }

    #[test]
    fn test_help() {
        let reg = registry();
        let help = reg.help(Some("echovalue"));
        assert_eq!(help.get("name"), Value::Text("echoValue".to_string()));
        assert_eq!(help.get("args").as_list().unwrap().len(), 1);
        assert!(reg.help(Some("nothing")).as_error().unwrap().is(codes::NOT_FOUND));

        let general = reg.help(None);
        let by_cat = general.get("functions");
        assert_eq!(by_cat.get("test"), Value::List(vec![Value::Text("echoValue".to_string())]));
    }

    #[test]
    fn test_list_functions_by_category() {
        let reg = registry();
        assert_eq!(reg.list_functions(None).as_list().unwrap().len(), 1);
        assert_eq!(reg.list_functions(Some("test")).as_list().unwrap().len(), 1);
        assert!(reg.list_functions(Some("calendar")).as_list().unwrap().is_empty());
    }

    #[test]
    fn test_catalog() {
        let catalog = registry().catalog();
        assert_eq!(catalog[0]["name"], "echoValue");
        assert_eq!(catalog[0]["args"][0]["optional"], false);
    }

    #[test]
    fn test_required_count() {
        let args = [
            ArgMeta::required("a", "Integer", ""),
            ArgMeta::optional("b", "Zone", "", "context zone"),
        ];
        assert_eq!(ArgMeta::required_count(&args), 1);
    }
}
