//! A from-scratch DPLL core: unit propagation plus chronological
//! backtracking over a plain clause-list store. No watched literals, no
//! clause learning, no restarts — the rule counts this workload deals
//! with (tens to low hundreds of rules per declaration cluster) make a
//! competition-grade CDCL solver disproportionate; see `examples/teeaychem-otter_sat`
//! for what that would look like.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    True,
    False,
}

/// An assignment over 1-based variable indices `1..=num_vars`; index 0 is
/// unused padding.
pub type Assignment = Vec<Option<Value>>;

fn literal_value(lit: i32, assignment: &Assignment) -> Option<Value> {
    let var = lit.unsigned_abs() as usize;
    assignment[var].map(|v| {
        let desired_true = lit > 0;
        if (v == Value::True) == desired_true {
            Value::True
        } else {
            Value::False
        }
    })
}

fn clause_status(clause: &[i32], assignment: &Assignment) -> ClauseStatus {
    let mut unassigned = None;
    let mut unassigned_count = 0;
    for &lit in clause {
        match literal_value(lit, assignment) {
            Some(Value::True) => return ClauseStatus::Satisfied,
            Some(Value::False) => {}
            None => {
                unassigned_count += 1;
                unassigned = Some(lit);
            }
        }
    }
    match unassigned_count {
        0 => ClauseStatus::Conflict,
        1 => ClauseStatus::Unit(unassigned.unwrap()),
        _ => ClauseStatus::Undetermined,
    }
}

enum ClauseStatus {
    Satisfied,
    Conflict,
    Unit(i32),
    Undetermined,
}

fn propagate(clauses: &[Vec<i32>], assignment: &mut Assignment) -> bool {
    loop {
        let mut progressed = false;
        for clause in clauses {
            match clause_status(clause, assignment) {
                ClauseStatus::Conflict => return false,
                ClauseStatus::Unit(lit) => {
                    let var = lit.unsigned_abs() as usize;
                    assignment[var] = Some(if lit > 0 { Value::True } else { Value::False });
                    progressed = true;
                }
                ClauseStatus::Satisfied | ClauseStatus::Undetermined => {}
            }
        }
        if !progressed {
            return true;
        }
    }
}

fn all_satisfied(clauses: &[Vec<i32>], assignment: &Assignment) -> bool {
    clauses.iter().all(|c| matches!(clause_status(c, assignment), ClauseStatus::Satisfied))
}

fn pick_unassigned(assignment: &Assignment) -> Option<usize> {
    (1..assignment.len()).find(|&v| assignment[v].is_none())
}

/// Finds a satisfying assignment for `clauses` over variables
/// `1..=num_vars`, if one exists. `prefer_true` controls which polarity is
/// tried first at each decision point — set it for the MaxSAT-biased
/// solver so it naturally finds larger include-sets before smaller ones.
pub fn solve(clauses: &[Vec<i32>], num_vars: usize, prefer_true: bool) -> Option<Assignment> {
    let mut assignment = vec![None; num_vars + 1];
    if dpll(clauses, &mut assignment, prefer_true) {
        Some(assignment)
    } else {
        None
    }
}

fn dpll(clauses: &[Vec<i32>], assignment: &mut Assignment, prefer_true: bool) -> bool {
    if !propagate(clauses, assignment) {
        return false;
    }
    if all_satisfied(clauses, assignment) {
        return true;
    }
    let Some(var) = pick_unassigned(assignment) else {
        return all_satisfied(clauses, assignment);
    };
    let order = if prefer_true { [Value::True, Value::False] } else { [Value::False, Value::True] };
    for value in order {
        let snapshot = assignment.clone();
        assignment[var] = Some(value);
        if dpll(clauses, assignment, prefer_true) {
            return true;
        }
        *assignment = snapshot;
    }
    assignment[var] = None;
    false
}
