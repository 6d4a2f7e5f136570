use crate::dice::Die;

/// Probability that `a` rolls strictly higher than `b`, over all ordered
/// face pairs. Note P(a>b) + P(b>a) does not reach 1 when the dice share
/// face values; ties make up the difference.
pub fn win_probability(a: &Die, b: &Die) -> f64 {
    count_pairs(a, b, |x, y| x > y) as f64 / pair_count(a, b)
}

/// Probability that `a` and `b` roll the same value.
pub fn tie_probability(a: &Die, b: &Die) -> f64 {
    count_pairs(a, b, |x, y| x == y) as f64 / pair_count(a, b)
}

fn count_pairs(a: &Die, b: &Die, pred: impl Fn(u64, u64) -> bool) -> usize {
    a.faces()
        .iter()
        .flat_map(|&x| b.faces().iter().map(move |&y| (x, y)))
        .filter(|&(x, y)| pred(x, y))
        .count()
}

fn pair_count(a: &Die, b: &Die) -> f64 {
    (a.faces().len() * b.faces().len()) as f64
}

/// Pairwise win probabilities for the full dice set, diagonal suppressed.
/// Rows are the would-be user die, columns the opponent.
pub struct WinMatrix {
    labels: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl WinMatrix {
    pub fn compute(dice: &[Die]) -> Self {
        let labels = dice.iter().map(Die::label).collect();
        let cells = dice
            .iter()
            .enumerate()
            .map(|(r, user)| {
                dice.iter()
                    .enumerate()
                    .map(|(c, opponent)| {
                        if r == c {
                            None
                        } else {
                            Some(win_probability(user, opponent))
                        }
                    })
                    .collect()
            })
            .collect();
        Self { labels, cells }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[row][col]
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }
}
