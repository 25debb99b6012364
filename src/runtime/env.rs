//! Variable environment
//!
//! One flat scope mapping variable names to values. The script language has
//! no functions and no block scoping, so a single table per run is the whole
//! model. Insertion order is tracked separately because the variable pane
//! displays variables in declaration order, which a hash map loses.

use super::value::Value;
use rustc_hash::FxHashMap;

/// The live variable table for a run
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: FxHashMap<String, Value>,
    insertion_order: Vec<String>, // Track order of first binding
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Bind a name to a value, creating the variable on first use
    pub fn bind(&mut self, name: &str, value: Value) {
        if !self.vars.contains_key(name) {
            self.insertion_order.push(name.to_string());
        }
        self.vars.insert(name.to_string(), value);
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.vars.get(name).map(|v| (name.as_str(), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_get() {
        let mut env = Environment::new();
        env.bind("x", Value::Number(5.0));
        assert_eq!(env.get("x"), Some(&Value::Number(5.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_rebind_keeps_order() {
        let mut env = Environment::new();
        env.bind("a", Value::Number(1.0));
        env.bind("b", Value::Number(2.0));
        env.bind("a", Value::Number(3.0));

        let names: Vec<&str> = env.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(env.get("a"), Some(&Value::Number(3.0)));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_iteration_order_is_declaration_order() {
        let mut env = Environment::new();
        env.bind("sum", Value::Number(0.0));
        env.bind("arr", Value::Array(vec![1.0, 2.0]));
        env.bind("i", Value::Number(0.0));

        let names: Vec<&str> = env.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["sum", "arr", "i"]);
    }
}
