//! List presentation for the selection screens.
//!
//! Turns the current wizard state into column headers and string rows, and
//! maps a row index back to the choice it stands for. When a screen accepts
//! manual entry, row 0 is always the manual-entry sentinel and every real
//! choice is shifted down by one.

use crate::catalog::Catalog;
use crate::navigator::{Choice, Wizard};
use crate::screen::{LocatorStep, ScreenId};
use crate::selection::{ActionKind, Fetched, TargetItem};

pub const MANUAL_ENTRY_LABEL: &str = "✎ Enter a value manually";

const LAST_CHANGE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Column header with a relative width weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub title: &'static str,
    pub weight: u16,
}

impl ColumnSpec {
    const fn new(title: &'static str, weight: u16) -> Self {
        Self { title, weight }
    }
}

/// What a row stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum RowPick {
    ManualEntry,
    Choice(Choice),
}

/// Column headers for the current screen. Empty for non-list screens.
pub fn columns(wizard: &Wizard) -> Vec<ColumnSpec> {
    match wizard.screen() {
        ScreenId::ChooseProvider
        | ScreenId::ChooseService
        | ScreenId::ChooseCategory
        | ScreenId::ChooseOperation
        | ScreenId::ConfirmAction => vec![ColumnSpec::new("Name", 1), ColumnSpec::new("Description", 2)],
        ScreenId::ChooseLocator => match wizard.locator_step() {
            LocatorStep::Profile => vec![ColumnSpec::new("Profile", 1)],
            LocatorStep::Region => vec![ColumnSpec::new("Region", 1)],
        },
        ScreenId::ChooseTarget => match wizard.selection().fetched() {
            Some(Fetched::Approvals(_)) => vec![
                ColumnSpec::new("Pipeline", 2),
                ColumnSpec::new("Stage", 1),
                ColumnSpec::new("Action", 1),
            ],
            _ => vec![
                ColumnSpec::new("Pipeline", 2),
                ColumnSpec::new("Stages", 3),
                ColumnSpec::new("Last change", 1),
            ],
        },
        ScreenId::EnterComment | ScreenId::Executing | ScreenId::Error => Vec::new(),
    }
}

/// Display rows, one per [`pick_row`] index, each with one cell per column.
pub fn rows(wizard: &Wizard) -> Vec<Vec<String>> {
    let width = columns(wizard).len();
    let mut rows = Vec::new();
    if manual_offset(wizard) == 1 {
        let mut sentinel = vec![String::new(); width.max(1)];
        sentinel[0] = MANUAL_ENTRY_LABEL.to_string();
        rows.push(sentinel);
    }
    rows.extend(choices(wizard).iter().map(choice_cells));
    rows
}

pub fn row_count(wizard: &Wizard) -> usize {
    manual_offset(wizard) + choices(wizard).len()
}

/// The choice behind row `index`, or `None` past the end of the list.
pub fn pick_row(wizard: &Wizard, index: usize) -> Option<RowPick> {
    let offset = manual_offset(wizard);
    if offset == 1 && index == 0 {
        return Some(RowPick::ManualEntry);
    }
    choices(wizard).into_iter().nth(index - offset).map(RowPick::Choice)
}

/// Message shown instead of an empty table.
pub fn empty_message(wizard: &Wizard) -> Option<&'static str> {
    if wizard.screen() != ScreenId::ChooseTarget || !choices(wizard).is_empty() {
        return None;
    }
    match wizard.selection().fetched() {
        Some(Fetched::Approvals(_)) => Some("No approvals are waiting in this account."),
        _ => Some("No pipelines found in this account."),
    }
}

/// Heading for the current screen, naming what is being chosen.
pub fn prompt(wizard: &Wizard) -> String {
    let selection = wizard.selection();
    match wizard.screen() {
        ScreenId::ChooseProvider => "Choose a cloud provider".to_string(),
        ScreenId::ChooseLocator => match wizard.locator_step() {
            LocatorStep::Profile => "Choose a credential profile".to_string(),
            LocatorStep::Region => format!("Choose a region for {}", selection.profile().unwrap_or("?")),
        },
        ScreenId::ChooseService => "Choose a service".to_string(),
        ScreenId::ChooseCategory => "Choose a category".to_string(),
        ScreenId::ChooseOperation => "Choose an operation".to_string(),
        ScreenId::ChooseTarget => match selection.fetched() {
            Some(Fetched::Approvals(_)) => "Choose a pending approval".to_string(),
            _ => "Choose a pipeline".to_string(),
        },
        ScreenId::ConfirmAction => match selection.target() {
            Some(target) => format!("What should happen to {}?", target.label()),
            None => "Choose an action".to_string(),
        },
        ScreenId::EnterComment => match wizard.text_field() {
            Some("revision") => "Enter the source revision to run".to_string(),
            _ => "Enter a comment for the decision".to_string(),
        },
        ScreenId::Executing => "Working".to_string(),
        ScreenId::Error => "Something went wrong".to_string(),
    }
}

/// `(label, value)` pairs for every committed selection, shallowest first.
pub fn breadcrumb(wizard: &Wizard) -> Vec<(&'static str, String)> {
    wizard
        .selection()
        .entries()
        .iter()
        .map(|entry| (entry.depth().label(), entry.display_value()))
        .collect()
}

pub(crate) fn manual_offset(wizard: &Wizard) -> usize {
    usize::from(wizard.accepts_manual_entry())
}

/// The real choices on the current screen, without the sentinel.
pub(crate) fn choices(wizard: &Wizard) -> Vec<Choice> {
    let selection = wizard.selection();
    match wizard.screen() {
        ScreenId::ChooseProvider => Catalog::global().providers().map(Choice::Provider).collect(),
        ScreenId::ChooseLocator => match wizard.locator_step() {
            LocatorStep::Profile => wizard.options().profiles.iter().cloned().map(Choice::Profile).collect(),
            LocatorStep::Region => wizard.options().regions.iter().cloned().map(Choice::Region).collect(),
        },
        ScreenId::ChooseService => selection
            .provider()
            .map(|provider| provider.services.iter().map(Choice::Service).collect())
            .unwrap_or_default(),
        ScreenId::ChooseCategory => selection
            .service()
            .map(|service| service.categories.iter().map(Choice::Category).collect())
            .unwrap_or_default(),
        ScreenId::ChooseOperation => selection
            .category()
            .map(|category| category.operations.iter().map(Choice::Operation).collect())
            .unwrap_or_default(),
        ScreenId::ChooseTarget => match selection.fetched() {
            Some(Fetched::Approvals(items)) => items
                .iter()
                .cloned()
                .map(|item| Choice::Target(TargetItem::Approval(item)))
                .collect(),
            Some(Fetched::Pipelines(items)) => items
                .iter()
                .cloned()
                .map(|item| Choice::Target(TargetItem::Pipeline(item)))
                .collect(),
            None => Vec::new(),
        },
        ScreenId::ConfirmAction => selection
            .operation()
            .map(|operation| {
                ActionKind::for_operation(operation.kind)
                    .iter()
                    .copied()
                    .map(Choice::Action)
                    .collect()
            })
            .unwrap_or_default(),
        ScreenId::EnterComment | ScreenId::Executing | ScreenId::Error => Vec::new(),
    }
}

fn choice_cells(choice: &Choice) -> Vec<String> {
    match choice {
        Choice::Provider(provider) => vec![provider.label.to_string(), provider.description.to_string()],
        Choice::Service(service) => vec![service.label.to_string(), service.description.to_string()],
        Choice::Category(category) => vec![category.label.to_string(), category.description.to_string()],
        Choice::Operation(operation) => vec![operation.label.to_string(), operation.description.to_string()],
        Choice::Profile(value) | Choice::Region(value) | Choice::Text(value) => vec![value.clone()],
        Choice::Target(TargetItem::Approval(item)) => vec![
            item.collection_name.clone(),
            item.stage_name.clone(),
            item.action_name.clone(),
        ],
        Choice::Target(TargetItem::Pipeline(item)) => vec![
            item.name.clone(),
            item.stage_summary(),
            item.updated_at
                .map(|at| at.format(LAST_CHANGE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        ],
        Choice::Action(action) => vec![action.label().to_string(), action.description().to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::LocatorOptions;

    fn locator_screen() -> Wizard {
        let provider = Catalog::global().provider("aws").expect("aws");
        Wizard::new(LocatorOptions {
            profiles: vec!["default".into(), "staging".into()],
            regions: vec!["us-east-1".into()],
        })
        .advance(Choice::Provider(provider))
        .expect("provider accepted")
        .wizard
    }

    #[test]
    fn manual_entry_sentinel_is_row_zero() {
        let wizard = locator_screen();
        let rows = rows(&wizard);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![MANUAL_ENTRY_LABEL.to_string()]);
        assert_eq!(rows[1], vec!["default".to_string()]);
        assert_eq!(pick_row(&wizard, 0), Some(RowPick::ManualEntry));
        assert_eq!(pick_row(&wizard, 2), Some(RowPick::Choice(Choice::Profile("staging".into()))));
        assert_eq!(pick_row(&wizard, 3), None);
    }

    #[test]
    fn screens_without_manual_entry_start_at_the_first_choice() {
        let wizard = Wizard::new(LocatorOptions::default());
        let rows = rows(&wizard);
        assert_eq!(rows, vec![vec!["AWS".to_string(), "Amazon Web Services".to_string()]]);
        assert!(matches!(pick_row(&wizard, 0), Some(RowPick::Choice(Choice::Provider(_)))));
        assert_eq!(columns(&wizard).len(), 2);
    }

    #[test]
    fn breadcrumb_lists_committed_values() {
        let wizard = locator_screen()
            .advance(Choice::Profile("staging".into()))
            .expect("profile accepted")
            .wizard;
        assert_eq!(
            breadcrumb(&wizard),
            vec![("provider", "AWS".to_string()), ("profile", "staging".to_string())]
        );
        assert_eq!(prompt(&wizard), "Choose a region for staging");
    }
}
