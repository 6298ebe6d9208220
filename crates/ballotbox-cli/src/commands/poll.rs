//! Poll command handlers
//!
//! Each handler works against a store that has already been refreshed, so
//! poll references can be resolved from the cache.

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;

use ballotbox_core::{DraftEditor, Id, Poll, PollService, PollStore};

use super::{explain, explain_poll_error};
use crate::editor::{self, confirm, DraftText, OptionText};
use crate::output::Output;

/// Edits requested on the command line for `ballot edit`
#[derive(Debug, Default)]
pub struct EditArgs {
    pub question: Option<String>,
    /// `N=TEXT` pairs, 1-based
    pub set: Vec<String>,
    pub add: Vec<String>,
    /// 1-based positions
    pub remove: Vec<usize>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.question.is_none() && self.set.is_empty() && self.add.is_empty() && self.remove.is_empty()
    }
}

/// List all polls with their results
pub fn list<S: PollService>(store: &PollStore<S>, output: &Output) -> Result<()> {
    output.print_polls(store.list());
    Ok(())
}

/// Show a single poll
pub fn show<S: PollService>(store: &PollStore<S>, poll_ref: &str, output: &Output) -> Result<()> {
    let poll_id = resolve_poll(store.list(), poll_ref)?;
    if let Some(poll) = store.get(&poll_id) {
        output.print_poll(poll);
    }
    Ok(())
}

/// Create a new poll
///
/// Without a question or options the draft is composed in $EDITOR.
pub async fn create<S: PollService>(
    store: &mut PollStore<S>,
    question: Option<String>,
    options: Vec<String>,
    output: &Output,
) -> Result<()> {
    let mut draft = DraftEditor::new();

    if question.is_none() && options.is_empty() {
        let content = editor::edit_text(&editor::render_draft(draft.draft(), "New poll"))?;
        apply_text(&mut draft, &editor::parse_draft(&content))?;
    } else {
        apply_text(
            &mut draft,
            &DraftText {
                question: question.unwrap_or_default(),
                options: options.iter().map(|o| OptionText::from(o.as_str())).collect(),
            },
        )?;
    }

    let poll = store
        .create(&mut draft)
        .await
        .map_err(explain_poll_error)
        .context("Failed to create poll")?;

    output.success(&format!("Created poll: {}", poll.id));
    output.print_poll(poll);
    Ok(())
}

/// Edit an existing poll
///
/// Command-line edits are applied in order: `--set`, then `--remove`, then
/// `--add`. Without any, the poll is edited in $EDITOR.
pub async fn edit<S: PollService>(
    store: &mut PollStore<S>,
    poll_ref: &str,
    args: EditArgs,
    output: &Output,
) -> Result<()> {
    let poll_id = resolve_poll(store.list(), poll_ref)?;
    let poll = store
        .get(&poll_id)
        .ok_or_else(|| anyhow!("Poll not found: {}", poll_ref))?;

    let mut draft = DraftEditor::new();
    draft.begin_edit(poll);

    if args.is_empty() {
        let heading = format!("Editing poll {}", poll_id);
        let content = editor::edit_text(&editor::render_draft(draft.draft(), &heading))?;
        apply_text(&mut draft, &editor::parse_draft(&content))?;
    } else {
        apply_edit_args(&mut draft, &args, output)?;
    }

    let updated = store
        .update(&poll_id, &mut draft)
        .await
        .map_err(explain_poll_error)
        .context("Failed to update poll")?;

    output.success("Poll updated");
    if let Some(poll) = updated {
        output.print_poll(poll);
    }
    Ok(())
}

/// Cast a vote
pub async fn vote<S: PollService>(
    store: &mut PollStore<S>,
    poll_ref: &str,
    option_ref: &str,
    output: &Output,
) -> Result<()> {
    let poll_id = resolve_poll(store.list(), poll_ref)?;
    let poll = store
        .get(&poll_id)
        .ok_or_else(|| anyhow!("Poll not found: {}", poll_ref))?;
    let option_id = resolve_option(poll, option_ref)?;

    let updated = store
        .cast_vote(&poll_id, &option_id)
        .await
        .map_err(explain)
        .context("Failed to cast vote")?;

    output.success("Vote recorded");
    if let Some(poll) = updated {
        output.print_poll(poll);
    }
    Ok(())
}

/// Delete a poll after confirmation
pub async fn delete<S: PollService>(
    store: &mut PollStore<S>,
    poll_ref: &str,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let poll_id = resolve_poll(store.list(), poll_ref)?;

    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to delete without confirmation. Pass --yes to delete non-interactively.");
        }
        let question = store
            .get(&poll_id)
            .map(|p| p.question.clone())
            .unwrap_or_default();
        println!("Delete poll: {} - {}", poll_id, question);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .remove(&poll_id)
        .await
        .map_err(explain)
        .context("Failed to delete poll")?;

    output.success(&format!("Deleted poll: {}", poll_id));
    Ok(())
}

/// Load question and option texts into the draft
///
/// Tagged lines update the option with that id. Untagged lines fill the
/// draft's id-less options in order, then are appended as new options. An
/// option with no line left is removed, or blanked when it is one of the
/// first two.
fn apply_text(draft: &mut DraftEditor, text: &DraftText) -> Result<()> {
    draft.set_question(text.question.as_str());

    let slots: Vec<Option<String>> = draft
        .draft()
        .options
        .iter()
        .map(|o| o.id.as_ref().map(Id::to_string))
        .collect();
    let mut untagged = slots
        .iter()
        .enumerate()
        .filter(|(_, id)| id.is_none())
        .map(|(index, _)| index);
    let mut texts: Vec<Option<&str>> = vec![None; slots.len()];
    let mut added = Vec::new();

    for option in &text.options {
        match option.id {
            Some(ref tag) => {
                let index = slots
                    .iter()
                    .position(|id| id.as_deref() == Some(tag.as_str()))
                    .ok_or_else(|| {
                        anyhow!("Unknown option [#{}]. Add new options without a tag.", tag)
                    })?;
                if texts[index].is_some() {
                    bail!("Option [#{}] appears more than once", tag);
                }
                texts[index] = Some(option.text.as_str());
            }
            None => match untagged.next() {
                Some(index) => texts[index] = Some(option.text.as_str()),
                None => added.push(option.text.as_str()),
            },
        }
    }

    for (index, text) in texts.iter().enumerate() {
        draft.set_option_text(index, text.unwrap_or(""))?;
    }
    // Highest first, so lower indices stay valid
    for index in (0..texts.len()).rev() {
        if texts[index].is_none() {
            draft.remove_option(index);
        }
    }
    for text in added {
        draft.append_option();
        let last = draft.draft().options.len() - 1;
        draft.set_option_text(last, text)?;
    }
    Ok(())
}

/// Apply `--question`, `--set`, `--remove` and `--add`
fn apply_edit_args(draft: &mut DraftEditor, args: &EditArgs, output: &Output) -> Result<()> {
    if let Some(ref question) = args.question {
        draft.set_question(question.as_str());
    }

    for pair in &args.set {
        let (position, text) = parse_set(pair)?;
        draft
            .set_option_text(position - 1, text)
            .with_context(|| format!("No option at position {}", position))?;
    }

    // Highest first, so earlier positions still refer to the original order
    let mut remove = args.remove.clone();
    remove.sort_unstable_by(|a, b| b.cmp(a));
    remove.dedup();
    for position in remove {
        if position == 0 || !draft.remove_option(position - 1) {
            output.message(&format!(
                "Option {} was not removed (options 1 and 2 are always kept)",
                position
            ));
        }
    }

    for text in &args.add {
        draft.append_option();
        let last = draft.draft().options.len() - 1;
        draft.set_option_text(last, text.as_str())?;
    }

    debug!("Draft after edits: {:?}", draft.draft());
    Ok(())
}

/// Parse `N=TEXT` into a 1-based position and text
fn parse_set(pair: &str) -> Result<(usize, &str)> {
    let (position, text) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid --set value '{}'. Use N=TEXT, e.g. --set 2=Banana", pair))?;
    let position: usize = position
        .trim()
        .parse()
        .with_context(|| format!("Invalid option position '{}'", position))?;
    if position == 0 {
        bail!("Option positions start at 1");
    }
    Ok((position, text))
}

/// Resolve a poll reference (full id or unique prefix)
fn resolve_poll(polls: &[Poll], poll_ref: &str) -> Result<Id> {
    if let Some(poll) = polls.iter().find(|p| p.id.to_string() == poll_ref) {
        return Ok(poll.id.clone());
    }

    let matches: Vec<_> = polls
        .iter()
        .filter(|p| p.id.to_string().starts_with(poll_ref))
        .collect();

    match matches.len() {
        0 => bail!("No poll found matching: {}", poll_ref),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple polls match '{}':", poll_ref);
            for poll in &matches {
                eprintln!("  {} - {}", poll.id, poll.question);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Resolve an option reference (option id, then option text)
fn resolve_option(poll: &Poll, option_ref: &str) -> Result<Id> {
    if let Some(option) = poll.options.iter().find(|o| o.id.to_string() == option_ref) {
        return Ok(option.id.clone());
    }

    let wanted = option_ref.trim().to_lowercase();
    let matches: Vec<_> = poll
        .options
        .iter()
        .filter(|o| o.text.trim().to_lowercase() == wanted)
        .collect();

    match matches.len() {
        1 => Ok(matches[0].id.clone()),
        0 => bail!(
            "No option '{}' in poll {}. Options: {}",
            option_ref,
            poll.id,
            poll.options
                .iter()
                .map(|o| format!("{} ({})", o.text, o.id))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        _ => bail!("Several options are named '{}'. Vote by option id instead.", option_ref),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use ballotbox_core::{EditSession, PollOption};

    fn poll(id: &str, question: &str, options: &[(&str, &str)]) -> Poll {
        Poll {
            id: Id::from(id),
            question: question.to_string(),
            options: options
                .iter()
                .map(|&(id, text)| PollOption {
                    id: Id::from(id),
                    text: text.to_string(),
                    votes: 0,
                })
                .collect(),
        }
    }

    fn polls() -> Vec<Poll> {
        vec![
            poll("65f1aa01", "Best fruit?", &[("o1", "Apple"), ("o2", "Banana")]),
            poll("65f1bb02", "Lunch?", &[("o3", "Pizza"), ("o4", "Tacos")]),
        ]
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn texts(draft: &DraftEditor) -> Vec<String> {
        draft.draft().options.iter().map(|o| o.text.clone()).collect()
    }

    #[test]
    fn test_resolve_poll_by_prefix() {
        let polls = polls();
        assert_eq!(resolve_poll(&polls, "65f1bb").unwrap(), Id::from("65f1bb02"));
        assert_eq!(resolve_poll(&polls, "65f1aa01").unwrap(), Id::from("65f1aa01"));
        assert!(resolve_poll(&polls, "65f1").is_err());
        assert!(resolve_poll(&polls, "zz").is_err());
    }

    #[test]
    fn test_resolve_exact_id_beats_prefix() {
        let polls = vec![
            poll("1", "One", &[("a", "A"), ("b", "B")]),
            poll("12", "Twelve", &[("c", "C"), ("d", "D")]),
        ];
        assert_eq!(resolve_poll(&polls, "1").unwrap(), Id::from("1"));
    }

    #[test]
    fn test_resolve_option() {
        let polls = polls();
        assert_eq!(resolve_option(&polls[0], "o2").unwrap(), Id::from("o2"));
        assert_eq!(resolve_option(&polls[0], "apple").unwrap(), Id::from("o1"));
        let err = resolve_option(&polls[0], "Cherry").unwrap_err();
        assert!(err.to_string().contains("Apple (o1)"));
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(parse_set("2=Banana split").unwrap(), (2, "Banana split"));
        assert_eq!(parse_set("1=").unwrap(), (1, ""));
        assert!(parse_set("Banana").is_err());
        assert!(parse_set("0=Zero").is_err());
        assert!(parse_set("x=Y").is_err());
    }

    #[test]
    fn test_apply_text_to_new_draft() {
        let mut draft = DraftEditor::new();
        apply_text(
            &mut draft,
            &DraftText {
                question: "Best fruit?".to_string(),
                options: vec!["Apple".into(), "Banana".into(), "Cherry".into()],
            },
        )
        .unwrap();

        assert_eq!(draft.draft().question, "Best fruit?");
        assert_eq!(texts(&draft), vec!["Apple", "Banana", "Cherry"]);
    }

    fn ids(draft: &DraftEditor) -> Vec<Option<Id>> {
        draft.draft().options.iter().map(|o| o.id.clone()).collect()
    }

    #[test]
    fn test_apply_text_keeps_ids_when_middle_line_deleted() {
        let mut original = poll("p", "Q", &[("a", "A"), ("b", "B"), ("c", "C")]);
        original.options[1].votes = 7;
        let mut draft = DraftEditor::new();
        draft.begin_edit(&original);

        let rendered = editor::render_draft(draft.draft(), "Editing poll p");
        let edited = rendered.replace("- [#b] B\n", "");
        apply_text(&mut draft, &editor::parse_draft(&edited)).unwrap();

        let sent: Vec<_> = draft
            .validate()
            .unwrap()
            .into_update_request()
            .options
            .into_iter()
            .map(|o| (o.id, o.text))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Some(Id::from("a")), "A".to_string()),
                (Some(Id::from("c")), "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_apply_text_blanks_first_two_and_appends_new() {
        let mut draft = DraftEditor::new();
        draft.begin_edit(&poll(
            "p",
            "Q",
            &[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")],
        ));

        apply_text(
            &mut draft,
            &DraftText {
                question: "Q".to_string(),
                options: vec![
                    OptionText {
                        id: Some("d".to_string()),
                        text: "D2".to_string(),
                    },
                    OptionText::from("E"),
                ],
            },
        )
        .unwrap();

        assert_eq!(texts(&draft), vec!["", "", "D2", "E"]);
        assert_eq!(
            ids(&draft),
            vec![
                Some(Id::from("a")),
                Some(Id::from("b")),
                Some(Id::from("d")),
                None
            ]
        );
    }

    #[test]
    fn test_apply_text_rejects_unknown_and_repeated_tags() {
        let tagged = |id: &str, text: &str| OptionText {
            id: Some(id.to_string()),
            text: text.to_string(),
        };
        let mut draft = DraftEditor::new();
        draft.begin_edit(&poll("p", "Q", &[("a", "A"), ("b", "B")]));

        let unknown = DraftText {
            question: "Q".to_string(),
            options: vec![tagged("a", "A"), tagged("zz", "Z")],
        };
        assert!(apply_text(&mut draft, &unknown).is_err());

        let repeated = DraftText {
            question: "Q".to_string(),
            options: vec![tagged("a", "A"), tagged("a", "A again")],
        };
        assert!(apply_text(&mut draft, &repeated).is_err());
    }

    #[test]
    fn test_apply_edit_args() {
        let mut draft = DraftEditor::new();
        draft.begin_edit(&poll(
            "p",
            "Best fruit?",
            &[("a", "Apple"), ("b", "Banana"), ("c", "Cherry"), ("d", "Date")],
        ));

        let args = EditArgs {
            question: Some("Best fruits?".to_string()),
            set: vec!["2=Blueberry".to_string()],
            add: vec!["Elderberry".to_string()],
            remove: vec![1, 3],
        };
        apply_edit_args(&mut draft, &args, &quiet()).unwrap();

        assert_eq!(draft.session(), &EditSession::Edit(Id::from("p")));
        assert_eq!(draft.draft().question, "Best fruits?");
        assert_eq!(texts(&draft), vec!["Apple", "Blueberry", "Date", "Elderberry"]);

        assert_eq!(
            ids(&draft),
            vec![Some(Id::from("a")), Some(Id::from("b")), Some(Id::from("d")), None]
        );
    }

    #[test]
    fn test_apply_edit_args_bad_position() {
        let mut draft = DraftEditor::new();
        let args = EditArgs {
            set: vec!["5=Nope".to_string()],
            ..Default::default()
        };
        assert!(apply_edit_args(&mut draft, &args, &quiet()).is_err());
    }
}
