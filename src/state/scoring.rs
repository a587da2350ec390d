//! Pure scoring rules for a sjoelen round.

/// Number of scoring gates on the board.
pub const GATE_COUNT: usize = 4;

/// Point value of each gate, left to right.
pub const GATE_VALUES: [i32; GATE_COUNT] = [2, 3, 4, 1];

/// Bonus awarded per complete set (one disc in every gate).
pub const COMPLETE_SET_BONUS: i32 = 20;

/// Disc counts per gate for a single round, left to right.
pub type GateCounts = [u8; GATE_COUNT];

/// Score a round from its per-gate disc counts.
///
/// Every complete set (one disc in each of the four gates) pays the flat
/// [`COMPLETE_SET_BONUS`]; discs left over after removing the complete sets
/// pay their gate's face value.
pub fn round_score(gates: GateCounts) -> i32 {
    let complete_sets = i32::from(gates.iter().copied().min().unwrap_or(0));

    let leftovers: i32 = gates
        .iter()
        .zip(GATE_VALUES)
        .map(|(&count, value)| (i32::from(count) - complete_sets) * value)
        .sum();

    complete_sets * COMPLETE_SET_BONUS + leftovers
}

/// Encode gate counts into the display form stored alongside a round score,
/// e.g. `7/7/9/7`.
pub fn encode_gates(gates: GateCounts) -> String {
    let mut out = String::new();
    for (index, count) in gates.iter().enumerate() {
        if index > 0 {
            out.push('/');
        }
        out.push_str(&count.to_string());
    }
    out
}

/// Total number of discs thrown in a round.
pub fn disc_count(gates: GateCounts) -> u32 {
    gates.iter().map(|&count| u32::from(count)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_scores_zero() {
        assert_eq!(round_score([0, 0, 0, 0]), 0);
    }

    #[test]
    fn single_complete_set_scores_bonus_only() {
        assert_eq!(round_score([1, 1, 1, 1]), 20);
    }

    #[test]
    fn documented_maximum_round() {
        // 7 complete sets plus two leftover discs in the 4-point gate.
        assert_eq!(round_score([7, 7, 9, 7]), 148);
    }

    #[test]
    fn leftovers_pay_face_value() {
        assert_eq!(round_score([3, 0, 0, 0]), 6);
        assert_eq!(round_score([0, 2, 0, 0]), 6);
        assert_eq!(round_score([0, 0, 2, 0]), 8);
        assert_eq!(round_score([0, 0, 0, 5]), 5);
    }

    #[test]
    fn formula_matches_definition() {
        // score = 20*min + sum((count - min) * value) for arbitrary boards.
        let boards: [GateCounts; 4] = [[2, 5, 1, 0], [6, 6, 6, 6], [0, 1, 0, 1], [10, 3, 8, 9]];
        for gates in boards {
            let min = i32::from(*gates.iter().min().unwrap());
            let expected: i32 = COMPLETE_SET_BONUS * min
                + gates
                    .iter()
                    .zip(GATE_VALUES)
                    .map(|(&count, value)| (i32::from(count) - min) * value)
                    .sum::<i32>();
            assert_eq!(round_score(gates), expected, "board {gates:?}");
        }
    }

    #[test]
    fn gate_encoding_is_slash_separated() {
        assert_eq!(encode_gates([7, 7, 9, 7]), "7/7/9/7");
        assert_eq!(encode_gates([0, 0, 0, 0]), "0/0/0/0");
    }

    #[test]
    fn disc_count_sums_all_gates() {
        assert_eq!(disc_count([7, 7, 9, 7]), 30);
        assert_eq!(disc_count([0, 0, 0, 0]), 0);
    }
}
