use super::tables::{get_table, get_view, object_names};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Resolves creation order for tables and views
pub struct DependencyResolver {
    /// Declaration order, used to break ties
    names: Vec<&'static str>,
    /// Map of object name -> objects it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
    /// Map of object name -> objects that depend on it
    reverse_deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let names = object_names();
        let mut deps: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        let mut reverse_deps: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();

        for &name in &names {
            let object_deps = match (get_table(name), get_view(name)) {
                (Some(table), _) => table.dependencies(),
                (None, Some(view)) => view.dependencies(),
                (None, None) => HashSet::new(),
            };

            for &dep in &object_deps {
                reverse_deps.entry(dep).or_default().insert(name);
            }
            deps.insert(name, object_deps);
        }

        Self {
            names,
            deps,
            reverse_deps,
        }
    }

    /// Objects `name` depends on, sorted by name
    pub fn dependencies_of(&self, name: &str) -> Vec<&'static str> {
        sorted(self.deps.get(name))
    }

    /// Objects that depend on `name`, sorted by name
    pub fn dependents_of(&self, name: &str) -> Vec<&'static str> {
        sorted(self.reverse_deps.get(name))
    }

    /// All objects in creation order (parents before children).
    ///
    /// Objects with no ordering constraint between them keep their
    /// declaration order.
    pub fn load_order(&self) -> Result<Vec<&'static str>> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for &name in &self.names {
            self.visit(name, &mut visited, &mut temp_visited, &mut result)?;
        }

        Ok(result)
    }

    fn visit(
        &self,
        name: &'static str,
        visited: &mut HashSet<&'static str>,
        temp_visited: &mut HashSet<&'static str>,
        result: &mut Vec<&'static str>,
    ) -> Result<()> {
        if temp_visited.contains(name) {
            return Err(Error::CircularDependency(name));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        // Declaration order, not hash order, so the result is stable
        for dep in self.names.iter().copied() {
            let is_dep = self.deps.get(name).is_some_and(|d| d.contains(dep));
            if is_dep && dep != name {
                self.visit(dep, visited, temp_visited, result)?;
            }
        }

        temp_visited.remove(name);
        visited.insert(name);
        result.push(name);

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted(set: Option<&HashSet<&'static str>>) -> Vec<&'static str> {
    let mut names: Vec<_> = set.into_iter().flatten().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_order() {
        let resolver = DependencyResolver::new();
        let order = resolver.load_order().unwrap();

        assert_eq!(
            order,
            vec![
                "mapping",
                "url_temp",
                "tld",
                "domain",
                "url",
                "top_10_urls",
                "top_10_tlds",
                "top_10_repeated_domains",
            ]
        );
    }

    #[test]
    fn test_url_depends_on_parents() {
        let resolver = DependencyResolver::new();
        assert_eq!(
            resolver.dependencies_of("url"),
            vec!["domain", "tld", "url_temp"]
        );
        assert!(resolver.dependencies_of("mapping").is_empty());
    }

    #[test]
    fn test_dependents() {
        let resolver = DependencyResolver::new();
        assert_eq!(
            resolver.dependents_of("url_temp"),
            vec!["domain", "tld", "url"]
        );
        assert_eq!(resolver.dependents_of("mapping"), vec!["top_10_tlds"]);
        assert!(resolver.dependents_of("top_10_urls").is_empty());
    }
}
