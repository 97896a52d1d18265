//! Edit-distance search for "did you mean" help.

use crate::base::Name;

use super::table::SymbolTable;

/// Suggestions are offered up to this Levenshtein distance.
pub(crate) const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Levenshtein distance, bounded: returns `None` once the distance is
/// guaranteed to exceed `max`.
pub(crate) fn levenshtein_bounded(a: &str, b: &str, max: usize) -> Option<usize> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m.abs_diff(n) > max {
        return None;
    }
    if m == 0 {
        return Some(n);
    }
    if n == 0 {
        return Some(m);
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        let mut row_min = curr[0];
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            row_min = row_min.min(curr[j]);
        }
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (prev[n] <= max).then_some(prev[n])
}

/// Search the current and enclosing scopes for the name closest to
/// `target`. Ties break toward the closest scope, then lexicographically.
pub(crate) fn find_similar<'a>(table: &SymbolTable<'a>, target: &str) -> Option<Name<'a>> {
    let mut best: Option<(usize, usize, Name<'a>)> = None;
    for (depth, scope_id) in table.scope_chain(table.current_scope()).into_iter().enumerate() {
        for candidate in table.scope(scope_id).names() {
            let Some(distance) =
                levenshtein_bounded(target, candidate.as_str(), MAX_SUGGESTION_DISTANCE)
            else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((best_distance, best_depth, best_name)) => {
                    (distance, depth, candidate.as_str())
                        < (*best_distance, *best_depth, best_name.as_str())
                }
            };
            if better {
                best = Some((distance, depth, candidate));
            }
        }
    }
    best.map(|(_, _, name)| name)
}
