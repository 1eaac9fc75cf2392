//! Variable-name assignment: a skolem pass (preserve the user's chosen
//! name where possible) followed by a class-biased non-skolem pass, both
//! drawing from one shared uniqueness pool so no two `MetaVar`s — skolem
//! or not — ever collide.

use rustc_hash::FxHashSet;

use crate::vartable::VarTable;

/// Infinite `a, b, …, z, a__0, b__0, …, z__0, a__1, …` name generator for
/// the non-skolem fallback pool.
struct AlphabetNames {
    round: u32,
    idx: u8,
}

impl AlphabetNames {
    fn new() -> Self {
        Self { round: 0, idx: 0 }
    }
}

impl Iterator for AlphabetNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let letter = (b'a' + self.idx) as char;
        let name = if self.round == 0 { letter.to_string() } else { format!("{letter}__{}", self.round - 1) };
        self.idx += 1;
        if self.idx == 26 {
            self.idx = 0;
            self.round += 1;
        }
        Some(name)
    }
}

fn unique(candidate: &str, used: &mut FxHashSet<String>, fallback: &mut AlphabetNames) -> String {
    if !used.contains(candidate) {
        used.insert(candidate.to_string());
        return candidate.to_string();
    }
    let mut n = 0u32;
    loop {
        let suffixed = format!("{candidate}__{n}");
        if !used.contains(&suffixed) {
            used.insert(suffixed.clone());
            return suffixed;
        }
        n += 1;
        // Guard against an unreachable infinite loop if `candidate` itself
        // collides with the fallback pool's own naming scheme.
        if n > 10_000 {
            let drawn = fallback.by_ref().find(|c| !used.contains(c)).expect("infinite generator");
            used.insert(drawn.clone());
            return drawn;
        }
    }
}

/// Class-bias preference per SPEC_FULL/spec.md §4.G: `Monad` -> `m`;
/// `Functor`/`Applicative`/`Alternative` -> `f`; `Foldable` -> `t`.
fn biased_letter(classes: &FxHashSet<String>) -> Option<&'static str> {
    if classes.contains("Monad") {
        Some("m")
    } else if classes.contains("Functor") || classes.contains("Applicative") || classes.contains("Alternative") {
        Some("f")
    } else if classes.contains("Foldable") {
        Some("t")
    } else {
        None
    }
}

/// Assigns `friendly_name` to every `MetaVar` in `table`: skolems first
/// (preserving their preferred name where free), then non-skolems by class
/// bias or the next unused letter in the shared alphabet sequence.
pub fn assign_names(table: &mut VarTable) {
    let mut used: FxHashSet<String> = FxHashSet::default();
    let mut fallback = AlphabetNames::new();

    for var in table.iter_mut().filter(|v| v.skolem) {
        let preferred = var.preferred_name.clone().unwrap_or_else(|| var.key.clone());
        var.friendly_name = Some(unique(&preferred, &mut used, &mut fallback));
    }

    for var in table.iter_mut().filter(|v| !v.skolem) {
        let name = match biased_letter(&var.classes) {
            Some(letter) if !used.contains(letter) => unique(letter, &mut used, &mut fallback),
            _ => loop {
                let candidate = fallback.next().expect("infinite generator");
                if !used.contains(&candidate) {
                    used.insert(candidate.clone());
                    break candidate;
                }
            },
        };
        var.friendly_name = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skolem_preserves_preferred_name_when_free() {
        let mut table = VarTable::new();
        table.register_var("a__id", true, Some("a".to_string()), 0);
        assign_names(&mut table);
        assert_eq!(table.get("a__id").unwrap().friendly_name.as_deref(), Some("a"));
    }

    #[test]
    fn colliding_skolem_names_get_suffixed() {
        let mut table = VarTable::new();
        table.register_var("a__f", true, Some("a".to_string()), 0);
        table.register_var("a__g", true, Some("a".to_string()), 0);
        assign_names(&mut table);
        let first = table.get("a__f").unwrap().friendly_name.clone().unwrap();
        let second = table.get("a__g").unwrap().friendly_name.clone().unwrap();
        assert_ne!(first, second);
        assert!(second.starts_with("a__0") || first.starts_with("a__0"));
    }

    #[test]
    fn non_skolem_vars_get_unique_letters() {
        let mut table = VarTable::new();
        table.register_var("V1", false, None, 0);
        table.register_var("V2", false, None, 0);
        assign_names(&mut table);
        let a = table.get("V1").unwrap().friendly_name.clone().unwrap();
        let b = table.get("V2").unwrap().friendly_name.clone().unwrap();
        assert_ne!(a, b);
        assert_eq!(a, "a");
        assert_eq!(b, "b");
    }

    #[test]
    fn monad_constrained_var_prefers_m() {
        let mut table = VarTable::new();
        table.register_var("V1", false, None, 0);
        table.add_class("V1", "Monad".to_string());
        assign_names(&mut table);
        assert_eq!(table.get("V1").unwrap().friendly_name.as_deref(), Some("m"));
    }
}
