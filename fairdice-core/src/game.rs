use crate::dice::{Die, DicePool, FACES};
use crate::protocol::{FairRound, RoundReveal};
use crate::rng::FairRandom;
use crate::transcript::{RoundPurpose, Transcript, TranscriptEntry};
use crate::Result;
use chrono::Utc;
use rand::{CryptoRng, RngCore};

const THROW_RANGE: u64 = FACES as u64;

/// Terminal capabilities the engine drives.
///
/// Production binds stdin/stdout (and a table renderer for the matrix);
/// tests script the input lines and capture the output.
pub trait GameIo {
    /// Print one protocol line.
    fn say(&mut self, line: &str) -> Result<()>;

    /// Print an inline prompt and read one line of input.
    fn prompt(&mut self, text: &str) -> Result<String>;

    /// Render the pairwise win-probability matrix for the given dice.
    fn show_probability_table(&mut self, dice: &[Die]) -> Result<()>;
}

/// Which side acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    User,
    Computer,
}

/// Where the game ended.
///
/// `Exited` travels up the call chain as a value; only the binary turns it
/// into process termination, so tests and embedders can intercept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    UserWins { user: u64, computer: u64 },
    ComputerWins { user: u64, computer: u64 },
    Draw { score: u64 },
    Exited,
}

enum Answer {
    Value(u64),
    Exit,
    Help,
}

/// The game state machine: first-move determination, dice selection, two
/// fair throws, comparison. Entropy and terminal I/O are injected so every
/// step can be made deterministic.
pub struct Game<R, IO> {
    pool: DicePool,
    original: Vec<Die>,
    rng: FairRandom<R>,
    io: IO,
    transcript: Transcript,
}

impl<R: RngCore + CryptoRng, IO: GameIo> Game<R, IO> {
    pub fn new(pool: DicePool, rng: FairRandom<R>, io: IO) -> Self {
        let original = pool.dice().to_vec();
        Self {
            pool,
            original,
            rng,
            io,
            transcript: Transcript::new(),
        }
    }

    /// Play one full game.
    pub fn run(mut self) -> Result<(Outcome, Transcript)> {
        self.io.say("Welcome to the Non-Transitive Dice Game!")?;
        let first = match self.determine_first_move()? {
            Some(turn) => turn,
            None => return self.exited(),
        };
        let (user_die, computer_die) = match self.select_dice(first)? {
            Some(pair) => pair,
            None => return self.exited(),
        };
        let computer_score = match self.throw(Turn::Computer, &computer_die)? {
            Some(score) => score,
            None => return self.exited(),
        };
        let user_score = match self.throw(Turn::User, &user_die)? {
            Some(score) => score,
            None => return self.exited(),
        };
        let outcome = self.compare(user_score, computer_score)?;
        Ok((outcome, self.transcript))
    }

    fn exited(mut self) -> Result<(Outcome, Transcript)> {
        self.io.say("Game exited.")?;
        tracing::info!("game exited at the user's request");
        Ok((Outcome::Exited, self.transcript))
    }

    /// Commit-reveal over one bit; an equal guess hands the first move to
    /// the human.
    fn determine_first_move(&mut self) -> Result<Option<Turn>> {
        let round = FairRound::open(&mut self.rng, 2);
        self.io.say("Let's determine who makes the first move.")?;
        self.io.say(&format!(
            "I selected a random value in the range 0..1 (HMAC={}).",
            round.tag_hex()
        ))?;
        let guess = loop {
            self.io.say("Try to guess my selection.")?;
            self.io.say("0 - 0")?;
            self.io.say("1 - 1")?;
            self.io.say("X - exit")?;
            self.io.say("? - help")?;
            match self.read_answer(1)? {
                Answer::Exit => return Ok(None),
                Answer::Help => {
                    self.show_help()?;
                    continue;
                }
                Answer::Value(v) => break v,
            }
        };
        let reveal = round.resolve(guess)?;
        self.io.say(&format!(
            "My selection: {} (KEY={}).",
            reveal.value,
            reveal.key_hex()
        ))?;
        let result = reveal.combined();
        self.record(RoundPurpose::FirstMove, &reveal, result);
        let turn = if reveal.value == guess {
            self.io.say("You make the first move!")?;
            Turn::User
        } else {
            self.io.say("I make the first move!")?;
            Turn::Computer
        };
        tracing::info!(?turn, "first move determined");
        Ok(Some(turn))
    }

    /// Whichever side won the first move picks a die; the other side picks
    /// from what remains. Returns `(user die, computer die)`.
    fn select_dice(&mut self, first: Turn) -> Result<Option<(Die, Die)>> {
        match first {
            Turn::User => {
                let user = match self.user_pick()? {
                    Some(die) => die,
                    None => return Ok(None),
                };
                let computer = self.computer_pick()?;
                Ok(Some((user, computer)))
            }
            Turn::Computer => {
                let computer = self.computer_pick()?;
                let user = match self.user_pick()? {
                    Some(die) => die,
                    None => return Ok(None),
                };
                Ok(Some((user, computer)))
            }
        }
    }

    /// The computer's pick is a zero-sum allocation, not an adversarial
    /// decision, so a plain fair draw suffices and nothing is committed.
    fn computer_pick(&mut self) -> Result<Die> {
        let index = self.rng.uniform(0, self.pool.len() as u64 - 1) as usize;
        let die = self.pool.remove(index)?;
        self.io.say(&format!("I chose the {die} dice."))?;
        tracing::info!(%die, "computer picked a die");
        Ok(die)
    }

    fn user_pick(&mut self) -> Result<Option<Die>> {
        let index = loop {
            self.io.say("Available dice:")?;
            for (i, die) in self.pool.dice().iter().enumerate() {
                self.io.say(&format!("{i} - {die}"))?;
            }
            self.io.say("X - exit")?;
            self.io.say("? - help")?;
            self.io.say("Choose your dice:")?;
            match self.read_answer(self.pool.len() as u64 - 1)? {
                Answer::Exit => return Ok(None),
                Answer::Help => {
                    self.show_help()?;
                    continue;
                }
                Answer::Value(v) => break v as usize,
            }
        };
        let die = self.pool.remove(index)?;
        self.io.say(&format!("You chose the {die} dice."))?;
        tracing::info!(%die, "user picked a die");
        Ok(Some(die))
    }

    /// One fair joint throw over the thrower's die: the computer commits to
    /// a face index, the human adds a plain number, and the face plus the
    /// number modulo 6 is the score.
    fn throw(&mut self, player: Turn, die: &Die) -> Result<Option<u64>> {
        self.io.say("")?;
        match player {
            Turn::Computer => self.io.say("It's my turn.")?,
            Turn::User => self.io.say("It's your turn.")?,
        }
        let round = FairRound::open(&mut self.rng, THROW_RANGE);
        self.io.say(&format!(
            "I selected a random value in the range 0..5 (HMAC={}).",
            round.tag_hex()
        ))?;
        let user_value = loop {
            self.io.say("Add your number modulo 6.")?;
            for v in 0..THROW_RANGE {
                self.io.say(&format!("{v} - {v}"))?;
            }
            self.io.say("X - exit")?;
            self.io.say("? - help")?;
            match self.read_answer(THROW_RANGE - 1)? {
                Answer::Exit => return Ok(None),
                Answer::Help => {
                    self.show_help()?;
                    continue;
                }
                Answer::Value(v) => break v,
            }
        };
        let reveal = round.resolve(user_value)?;
        self.io.say(&format!(
            "My selection: {} (KEY={}).",
            reveal.value,
            reveal.key_hex()
        ))?;
        let face = die.face(reveal.value as usize);
        let score = (face % THROW_RANGE + user_value) % THROW_RANGE;
        self.io.say(&format!(
            "The result is {face} + {user_value} = {score} (mod {THROW_RANGE})."
        ))?;
        let purpose = match player {
            Turn::Computer => RoundPurpose::ComputerThrow,
            Turn::User => RoundPurpose::UserThrow,
        };
        self.record(purpose, &reveal, score);
        tracing::info!(?player, face, user_value, score, "throw resolved");
        Ok(Some(score))
    }

    fn compare(&mut self, user: u64, computer: u64) -> Result<Outcome> {
        self.io.say("Comparing throws:")?;
        self.io.say(&format!("Your throw: {user}"))?;
        self.io.say(&format!("My throw: {computer}"))?;
        let outcome = if user > computer {
            self.io.say(&format!("You win ({user} > {computer})!"))?;
            Outcome::UserWins { user, computer }
        } else if user < computer {
            self.io.say(&format!("I win ({computer} > {user})!"))?;
            Outcome::ComputerWins { user, computer }
        } else {
            self.io.say(&format!("It's a draw ({computer} = {user})!"))?;
            Outcome::Draw { score: user }
        };
        tracing::info!(?outcome, "game resolved");
        Ok(outcome)
    }

    /// Single retry loop for every prompt: `X` and `?` are recognized at
    /// each of them, anything else must be an integer within `0..=max`.
    fn read_answer(&mut self, max: u64) -> Result<Answer> {
        loop {
            let line = self.io.prompt("Your selection: ")?;
            let token = line.trim();
            match token {
                "X" => return Ok(Answer::Exit),
                "?" => return Ok(Answer::Help),
                _ => match token.parse::<u64>() {
                    Ok(v) if v <= max => return Ok(Answer::Value(v)),
                    _ => self.io.say("Invalid input. Try again:")?,
                },
            }
        }
    }

    fn show_help(&mut self) -> Result<()> {
        self.io.say("Help: Non-Transitive Dice Game.")?;
        self.io
            .say("Each die has exactly 6 faces; no die wins against every other.")?;
        self.io.say("Probability of winning for all dice:")?;
        self.io.show_probability_table(&self.original)
    }

    fn record(&mut self, purpose: RoundPurpose, reveal: &RoundReveal, result: u64) {
        self.transcript.record(TranscriptEntry {
            purpose,
            range: reveal.range,
            tag: reveal.tag.clone(),
            value: reveal.value,
            key: reveal.key_hex(),
            user_value: reveal.user_value,
            result,
            // FairRound::resolve aborts on a failed check, so an entry can
            // only exist for a verified round
            verified: true,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::fixtures::StepEntropy;
    use crate::GameError;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct Captured {
        output: Vec<String>,
        tables: usize,
    }

    struct ScriptedIo {
        lines: VecDeque<String>,
        captured: Rc<RefCell<Captured>>,
    }

    impl ScriptedIo {
        fn new(lines: &[&str]) -> (Self, Rc<RefCell<Captured>>) {
            let captured = Rc::new(RefCell::new(Captured::default()));
            let io = Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                captured: Rc::clone(&captured),
            };
            (io, captured)
        }
    }

    impl GameIo for ScriptedIo {
        fn say(&mut self, line: &str) -> Result<()> {
            self.captured.borrow_mut().output.push(line.to_string());
            Ok(())
        }

        fn prompt(&mut self, text: &str) -> Result<String> {
            self.captured.borrow_mut().output.push(text.to_string());
            self.lines.pop_front().ok_or_else(|| {
                GameError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "input script exhausted",
                ))
            })
        }

        fn show_probability_table(&mut self, dice: &[Die]) -> Result<()> {
            let mut captured = self.captured.borrow_mut();
            captured.tables += 1;
            captured.output.push(format!("<matrix of {} dice>", dice.len()));
            Ok(())
        }
    }

    fn classic_pool() -> DicePool {
        let args: Vec<String> = ["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        DicePool::parse(&args).unwrap()
    }

    fn play(
        draws: &[u64],
        lines: &[&str],
    ) -> (Outcome, Transcript, Rc<RefCell<Captured>>) {
        let (io, captured) = ScriptedIo::new(lines);
        let game = Game::new(classic_pool(), FairRandom::new(StepEntropy::new(draws)), io);
        let (outcome, transcript) = game.run().unwrap();
        (outcome, transcript, captured)
    }

    fn position(output: &[String], needle: &str) -> usize {
        output
            .iter()
            .position(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("missing '{needle}' in output"))
    }

    #[test]
    fn correct_guess_then_user_win_end_to_end() {
        // first-move bit 0, computer die pick index 0, computer throw
        // value 4, user throw value 0
        let (outcome, transcript, captured) =
            play(&[0, 0, 4, 0], &["0", "0", "1", "3"]);

        let captured = captured.borrow();
        let output = &captured.output;
        assert!(output.iter().any(|l| l == "You make the first move!"));
        assert!(output.iter().any(|l| l == "You chose the [2,2,4,4,9,9] dice."));
        assert!(output.iter().any(|l| l == "I chose the [6,8,1,1,8,6] dice."));
        // computer throw: face 8 of [6,8,1,1,8,6] plus 1
        assert!(output.iter().any(|l| l == "The result is 8 + 1 = 3 (mod 6)."));
        // user throw: face 2 of [2,2,4,4,9,9] plus 3
        assert!(output.iter().any(|l| l == "The result is 2 + 3 = 5 (mod 6)."));
        assert!(output.iter().any(|l| l == "You win (5 > 3)!"));
        assert_eq!(
            outcome,
            Outcome::UserWins {
                user: 5,
                computer: 3
            }
        );

        assert_eq!(transcript.entries.len(), 3);
        assert_eq!(transcript.entries[0].purpose, RoundPurpose::FirstMove);
        assert_eq!(transcript.entries[1].purpose, RoundPurpose::ComputerThrow);
        assert_eq!(transcript.entries[2].purpose, RoundPurpose::UserThrow);
        assert!(transcript.all_verified());
    }

    #[test]
    fn tag_is_published_before_the_guess_is_read() {
        let (_, _, captured) = play(&[0, 0, 4, 0], &["0", "0", "1", "3"]);
        let captured = captured.borrow();
        let output = &captured.output;
        let tag_at = position(output, "range 0..1 (HMAC=");
        let prompt_at = position(output, "Your selection: ");
        let reveal_at = position(output, "My selection: 0 (KEY=");
        assert!(tag_at < prompt_at);
        assert!(prompt_at < reveal_at);
    }

    #[test]
    fn wrong_guess_hands_the_first_move_to_the_computer() {
        let (outcome, _, captured) = play(&[1, 0, 0, 0], &["0", "0", "0", "0"]);
        let captured = captured.borrow();
        assert!(captured
            .output
            .iter()
            .any(|l| l == "I make the first move!"));
        // computer picked [2,2,4,4,9,9] and threw face 2 + 0 = 2;
        // user picked [6,8,1,1,8,6] and threw face 6 + 0 = 0
        assert_eq!(
            outcome,
            Outcome::ComputerWins {
                user: 0,
                computer: 2
            }
        );
    }

    #[test]
    fn equal_scores_draw() {
        let args: Vec<String> = ["1,1,1,1,1,1", "1,1,1,1,1,1", "1,1,1,1,1,1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (io, _) = ScriptedIo::new(&["0", "0", "0", "0"]);
        let game = Game::new(
            DicePool::parse(&args).unwrap(),
            FairRandom::new(StepEntropy::new(&[0, 0, 0, 0])),
            io,
        );
        let (outcome, _) = game.run().unwrap();
        assert_eq!(outcome, Outcome::Draw { score: 1 });
    }

    #[test]
    fn exit_at_the_first_move_prompt() {
        let (outcome, transcript, captured) = play(&[0], &["X"]);
        assert_eq!(outcome, Outcome::Exited);
        assert!(transcript.entries.is_empty());
        let captured = captured.borrow();
        assert_eq!(captured.output.last().unwrap(), "Game exited.");
    }

    #[test]
    fn exit_at_the_dice_selection_prompt() {
        let (outcome, _, captured) = play(&[0], &["0", "X"]);
        assert_eq!(outcome, Outcome::Exited);
        let captured = captured.borrow();
        assert_eq!(captured.output.last().unwrap(), "Game exited.");
    }

    #[test]
    fn exit_at_the_throw_prompt() {
        let (outcome, transcript, captured) = play(&[0, 0, 4], &["0", "0", "X"]);
        assert_eq!(outcome, Outcome::Exited);
        // the first-move round resolved before the exit
        assert_eq!(transcript.entries.len(), 1);
        let captured = captured.borrow();
        assert_eq!(captured.output.last().unwrap(), "Game exited.");
    }

    #[test]
    fn invalid_input_reprompts_until_valid() {
        let (outcome, _, captured) =
            play(&[0, 0, 4, 0], &["abc", "9", "0", "0", "1", "3"]);
        let captured = captured.borrow();
        let retries = captured
            .output
            .iter()
            .filter(|l| *l == "Invalid input. Try again:")
            .count();
        assert_eq!(retries, 2);
        assert!(matches!(outcome, Outcome::UserWins { .. }));
    }

    #[test]
    fn help_shows_the_matrix_and_reissues_the_prompt() {
        let (outcome, _, captured) =
            play(&[0, 0, 4, 0], &["?", "0", "0", "1", "3"]);
        let captured = captured.borrow();
        assert_eq!(captured.tables, 1);
        assert!(captured
            .output
            .iter()
            .any(|l| l == "<matrix of 3 dice>"));
        let menus = captured
            .output
            .iter()
            .filter(|l| *l == "Try to guess my selection.")
            .count();
        assert_eq!(menus, 2);
        assert!(matches!(outcome, Outcome::UserWins { .. }));
    }

    #[test]
    fn help_during_a_throw_covers_the_original_dice_set() {
        // dice were already removed from the pool by the time of the throw,
        // the matrix still shows all three
        let (_, _, captured) = play(&[0, 0, 4, 0], &["0", "0", "?", "1", "3"]);
        let captured = captured.borrow();
        assert_eq!(captured.tables, 1);
        assert!(captured
            .output
            .iter()
            .any(|l| l == "<matrix of 3 dice>"));
    }

    #[test]
    fn exhausted_input_surfaces_as_an_io_error() {
        let (io, _) = ScriptedIo::new(&[]);
        let game = Game::new(
            classic_pool(),
            FairRandom::new(StepEntropy::new(&[0])),
            io,
        );
        assert!(matches!(game.run(), Err(GameError::Io(_))));
    }
}
