use rustc_hash::FxHashMap;

/// Maps internal rule ids to small positive propositional-variable
/// literals (1-based) and back, so callers can pass `set<int>` rule ids
/// while the core solver only ever sees a dense `1..=n` variable range.
#[derive(Debug, Clone)]
pub struct VarMap {
    rule_to_var: FxHashMap<u32, i32>,
    var_to_rule: Vec<u32>,
}

impl VarMap {
    pub fn new(rule_ids: &[u32]) -> Self {
        let mut rule_to_var = FxHashMap::default();
        let mut var_to_rule = vec![0u32];
        for &rule in rule_ids {
            let var = var_to_rule.len() as i32;
            var_to_rule.push(rule);
            rule_to_var.insert(rule, var);
        }
        Self { rule_to_var, var_to_rule }
    }

    pub fn num_vars(&self) -> usize {
        self.var_to_rule.len() - 1
    }

    pub fn var_of(&self, rule_id: u32) -> i32 {
        *self.rule_to_var.get(&rule_id).expect("rule id not in this solver's universe")
    }

    pub fn rule_of(&self, var: i32) -> u32 {
        self.var_to_rule[var.unsigned_abs() as usize]
    }

    /// Converts a clause of signed rule-id literals (positive = include,
    /// negative = exclude) into signed variable-index literals.
    pub fn literal_clause(&self, literals: &[i32]) -> Vec<i32> {
        literals
            .iter()
            .map(|&lit| {
                let var = self.var_of(lit.unsigned_abs());
                if lit > 0 {
                    var
                } else {
                    -var
                }
            })
            .collect()
    }
}
