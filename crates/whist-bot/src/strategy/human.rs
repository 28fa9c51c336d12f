use super::{PlayerView, StrategyError};
use std::fmt;
use std::io::{self, BufRead, Write};
use whist_core::model::card::Card;

/// A person at the console. Re-prompts until the entry is one of the offered choices.
pub struct HumanStrategy {
    name: String,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl HumanStrategy {
    pub fn new(name: impl Into<String>, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    /// Reads through the process-wide stdin buffer, so unread lines stay
    /// available to the next console seat.
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::new(name, Box::new(io::stdin().lock()), Box::new(io::stdout()))
    }

    pub(crate) fn make_bid(&mut self, view: &PlayerView, options: &[u8]) -> Result<u8, StrategyError> {
        writeln!(self.output, "{} to bid (trump: {})", self.name, view.trump)?;
        self.print_hand(view, &[])?;
        let choices: Vec<usize> = options.iter().map(|&bid| usize::from(bid)).collect();
        let prompt = format!("Choose your bid from {options:?}: ");
        let bid = self.read_choice(&prompt, &choices)?;
        Ok(bid as u8)
    }

    pub(crate) fn play_card(&mut self, view: &PlayerView, legal: &[Card]) -> Result<Card, StrategyError> {
        let played = view
            .trick
            .cards()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            self.output,
            "{} to play (bid {}, won {}), played so far: [{}]",
            self.name,
            view.contract.map_or_else(|| "-".to_string(), |bid| bid.to_string()),
            view.trick_count,
            played
        )?;
        self.print_hand(view, legal)?;

        let choices: Vec<usize> = view
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| legal.contains(card))
            .map(|(index, _)| index)
            .collect();
        let index = self.read_choice("choose index: ", &choices)?;
        Ok(view.hand.cards()[index])
    }

    /// Numbers the playable cards; an empty `legal` lists the hand without numbers.
    fn print_hand(&mut self, view: &PlayerView, legal: &[Card]) -> io::Result<()> {
        writeln!(self.output, "{}", "-".repeat(15))?;
        for (index, card) in view.hand.iter().enumerate() {
            if legal.contains(card) {
                writeln!(self.output, "{index:2}  | {card}")?;
            } else {
                writeln!(self.output, "    | {card}")?;
            }
        }
        writeln!(self.output, "{}", "-".repeat(15))
    }

    fn read_choice(&mut self, prompt: &str, choices: &[usize]) -> Result<usize, StrategyError> {
        let mut line = String::new();
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(StrategyError::InputClosed);
            }
            match line.trim().parse::<usize>() {
                Ok(choice) if choices.contains(&choice) => return Ok(choice),
                _ => writeln!(self.output, "invalid")?,
            }
        }
    }
}

impl fmt::Debug for HumanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumanStrategy")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
