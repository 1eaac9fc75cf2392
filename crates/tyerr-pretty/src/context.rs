//! Class-context normalization: drop superclass-redundant constraints and
//! render the remaining set as `(C1 v1, C2 v2) =>` (or its 0/1-constraint
//! shorthand).

use rustc_hash::{FxHashMap, FxHashSet};

/// All classes reachable from `class` via zero or more immediate-superclass
/// steps in `superclasses` (a class's own transitive superclass set, not
/// including itself unless there's a cycle — the corpus has none).
fn transitive_superclasses(class: &str, superclasses: &FxHashMap<String, Vec<String>>) -> FxHashSet<String> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![class.to_string()];
    while let Some(c) = stack.pop() {
        if let Some(parents) = superclasses.get(&c) {
            for parent in parents {
                if seen.insert(parent.clone()) {
                    stack.push(parent.clone());
                }
            }
        }
    }
    seen
}

/// Drops any class in `classes` that is a (transitive) superclass of
/// another member of the same set.
pub fn prune_superclasses(classes: &FxHashSet<String>, superclasses: &FxHashMap<String, Vec<String>>) -> Vec<String> {
    let mut kept: Vec<String> = classes
        .iter()
        .filter(|candidate| {
            !classes.iter().any(|other| {
                other != *candidate && transitive_superclasses(other, superclasses).contains(*candidate)
            })
        })
        .cloned()
        .collect();
    kept.sort();
    kept
}

/// Renders a job's full context prefix from its `(class, var friendly
/// name)` requirements, already pruned per variable: empty for no
/// constraints, `C v=>` for exactly one, `(C1 v1,C2 v2)=>` for several,
/// alphabetized by class name then variable name.
pub fn render_context(mut requirements: Vec<(String, String)>) -> String {
    requirements.sort();
    match requirements.len() {
        0 => String::new(),
        1 => {
            let (class, var) = &requirements[0];
            format!("{class} {var}=>")
        }
        _ => {
            let joined = requirements.iter().map(|(c, v)| format!("{c} {v}")).collect::<Vec<_>>().join(",");
            format!("({joined})=>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_a_superclass_in_favor_of_its_subclass() {
        let classes: FxHashSet<String> = ["Ord".to_string(), "Eq".to_string()].into_iter().collect();
        let superclasses = FxHashMap::from_iter([("Ord".to_string(), vec!["Eq".to_string()])]);
        assert_eq!(prune_superclasses(&classes, &superclasses), vec!["Ord".to_string()]);
    }

    #[test]
    fn unrelated_classes_are_both_kept() {
        let classes: FxHashSet<String> = ["Num".to_string(), "Show".to_string()].into_iter().collect();
        let superclasses = FxHashMap::default();
        let mut kept = prune_superclasses(&classes, &superclasses);
        kept.sort();
        assert_eq!(kept, vec!["Num".to_string(), "Show".to_string()]);
    }

    #[test]
    fn context_rendering_shorthands() {
        assert_eq!(render_context(vec![]), "");
        assert_eq!(render_context(vec![("Num".to_string(), "a".to_string())]), "Num a=>");
        assert_eq!(
            render_context(vec![("Show".to_string(), "b".to_string()), ("Num".to_string(), "a".to_string())]),
            "(Num a,Show b)=>"
        );
    }
}
