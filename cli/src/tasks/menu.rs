//! Init script selection menu.
use std::io::{self, BufRead as _, Write as _};

use anyhow::{Context as _, Result};

use crate::logging::Log;
use crate::resources::script::InitScript;

/// Source of the answers to the two menu questions.
#[cfg_attr(test, mockall::automock)]
pub trait MenuPrompt: Send + Sync {
    /// Ask whether the user wants to edit the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm_edit(&self) -> Result<bool>;

    /// Read one line of script ids to toggle.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be read.
    fn read_toggles(&self) -> Result<String>;
}

/// Asks on stdout and reads the answers from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl StdinPrompt {
    /// Print `question` and read one line; `None` at end of input.
    #[allow(clippy::print_stdout)]
    fn ask(question: &str) -> Result<Option<String>> {
        print!("{question}");
        io::stdout().flush().context("flushing stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("reading from stdin")?;
        Ok((read > 0).then_some(line))
    }
}

impl MenuPrompt for StdinPrompt {
    fn confirm_edit(&self) -> Result<bool> {
        let answer = Self::ask("\nEnter yes (y) to edit the list: ")?;
        Ok(answer.is_some_and(|a| matches!(a.trim(), "y" | "Y")))
    }

    fn read_toggles(&self) -> Result<String> {
        Ok(Self::ask("\nEnter the script ids to toggle: ")?.unwrap_or_default())
    }
}

/// Never edits: the default selection is used as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptDefaults;

impl MenuPrompt for AcceptDefaults {
    fn confirm_edit(&self) -> Result<bool> {
        Ok(false)
    }

    fn read_toggles(&self) -> Result<String> {
        Ok(String::new())
    }
}

/// The numbered list of init scripts and whether each one will run.
#[derive(Debug, Clone)]
pub struct Menu {
    entries: Vec<(InitScript, bool)>,
}

impl Menu {
    /// Build a menu from scripts in enumeration order and their default selection.
    #[must_use]
    pub const fn new(entries: Vec<(InitScript, bool)>) -> Self {
        Self { entries }
    }

    /// Number of scripts listed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the menu lists no scripts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `"<id>. <basename>"` for each script, with its selection flag.
    #[must_use]
    pub fn lines(&self) -> Vec<(bool, String)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (script, selected))| (*selected, format!("{i}. {}", script.name())))
            .collect()
    }

    /// Print the menu: selected scripts with a tick, the others with a cross.
    pub fn render(&self, log: &dyn Log) {
        log.header("Run the following init scripts");
        for (selected, line) in self.lines() {
            if selected {
                log.ok(&line);
            } else {
                log.ko(&line);
            }
        }
    }

    /// Flip the selection of script `id`. Returns `false` if there is no such script.
    pub fn toggle(&mut self, id: usize) -> bool {
        self.entries.get_mut(id).is_some_and(|(_, selected)| {
            *selected = !*selected;
            true
        })
    }

    /// Offer to edit the selection. Returns `true` if the user edited it.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be answered.
    pub fn edit(&mut self, prompt: &dyn MenuPrompt, log: &dyn Log) -> Result<bool> {
        if !prompt.confirm_edit()? {
            return Ok(false);
        }

        let line = prompt.read_toggles()?;
        let (ids, invalid) = parse_toggles(&line);
        for token in invalid {
            log.warn(&format!("Expected script ids but found {token}"));
        }
        for id in ids {
            if !self.toggle(id) {
                log.warn(&format!("No init script with id {id}"));
            }
        }
        Ok(true)
    }

    /// Scripts that will run, in menu order.
    pub fn selected(&self) -> impl Iterator<Item = &InitScript> {
        self.entries
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(script, _)| script)
    }

    /// Scripts that will not run, in menu order.
    pub fn unselected(&self) -> impl Iterator<Item = &InitScript> {
        self.entries
            .iter()
            .filter(|(_, selected)| !*selected)
            .map(|(script, _)| script)
    }
}

/// Split a line of comma- or whitespace-separated ids.
///
/// Returns the parsed ids and the tokens that are not ids.
fn parse_toggles(line: &str) -> (Vec<usize>, Vec<String>) {
    let mut ids = Vec::new();
    let mut invalid = Vec::new();
    for token in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match token.parse() {
            Ok(id) => ids.push(id),
            Err(_) => invalid.push(token.to_string()),
        }
    }
    (ids, invalid)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{Layout, Subdir};
    use crate::tasks::test_helpers::RecordingLog;

    fn menu(selected: &[bool]) -> Menu {
        let layout = Layout::new("/home/u");
        let names = ["10-base.sh", "20-brew.sh", "30-fonts.sh"];
        Menu::new(
            names
                .iter()
                .zip(selected)
                .map(|(name, &sel)| {
                    (
                        InitScript::new(&layout, layout.subdir(Subdir::Init).join(name)),
                        sel,
                    )
                })
                .collect(),
        )
    }

    fn names<'a>(scripts: impl Iterator<Item = &'a InitScript>) -> Vec<String> {
        scripts.map(InitScript::name).collect()
    }

    #[test]
    fn parse_accepts_commas_and_spaces() {
        assert_eq!(parse_toggles("0 2\n"), (vec![0, 2], vec![]));
        assert_eq!(parse_toggles("0,2"), (vec![0, 2], vec![]));
        assert_eq!(parse_toggles(" 1, 2 ,"), (vec![1, 2], vec![]));
    }

    #[test]
    fn parse_reports_non_ids() {
        let (ids, invalid) = parse_toggles("1 x -3");
        assert_eq!(ids, [1]);
        assert_eq!(invalid, ["x", "-3"]);
    }

    #[test]
    fn render_marks_selection() {
        let log = RecordingLog::default();
        menu(&[true, false, true]).render(&log);
        insta::assert_snapshot!(log.lines().join("\n"), @r"
        header: Run the following init scripts
        ok: 0. 10-base.sh
        ko: 1. 20-brew.sh
        ok: 2. 30-fonts.sh
        ");
    }

    #[test]
    fn toggle_out_of_range_is_rejected() {
        let mut m = menu(&[true, true, true]);
        assert!(m.toggle(1));
        assert!(!m.toggle(3));
        assert_eq!(names(m.selected()), ["10-base.sh", "30-fonts.sh"]);
        assert_eq!(names(m.unselected()), ["20-brew.sh"]);
    }

    #[test]
    fn declining_edit_keeps_defaults() {
        let mut prompt = MockMenuPrompt::new();
        prompt.expect_confirm_edit().times(1).returning(|| Ok(false));
        prompt.expect_read_toggles().never();
        let log = RecordingLog::default();

        let mut m = menu(&[true, false, true]);
        assert!(!m.edit(&prompt, &log).unwrap());
        assert_eq!(names(m.selected()), ["10-base.sh", "30-fonts.sh"]);
    }

    #[test]
    fn edit_toggles_valid_ids_and_reports_the_rest() {
        let mut prompt = MockMenuPrompt::new();
        prompt.expect_confirm_edit().times(1).returning(|| Ok(true));
        prompt
            .expect_read_toggles()
            .times(1)
            .returning(|| Ok("0, 1 foo 7\n".to_string()));
        let log = RecordingLog::default();

        let mut m = menu(&[true, false, true]);
        assert!(m.edit(&prompt, &log).unwrap());

        assert_eq!(names(m.selected()), ["20-brew.sh", "30-fonts.sh"]);
        assert_eq!(
            log.of("warn"),
            [
                "Expected script ids but found foo",
                "No init script with id 7"
            ]
        );
    }

    #[test]
    fn accept_defaults_never_edits() {
        let mut m = menu(&[false, false, false]);
        let log = RecordingLog::default();
        assert!(!m.edit(&AcceptDefaults, &log).unwrap());
        assert_eq!(m.selected().count(), 0);
        assert_eq!(m.len(), 3);
    }
}
