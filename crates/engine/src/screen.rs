use std::fmt;

/// Every screen the wizard can show.
///
/// The selection screens form a fixed chain from [`ScreenId::INITIAL`] down to
/// [`ScreenId::EnterComment`]. `Executing` and `Error` sit outside that chain:
/// their way back depends on which screen launched the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    ChooseProvider,
    ChooseLocator,
    ChooseService,
    ChooseCategory,
    ChooseOperation,
    ChooseTarget,
    ConfirmAction,
    EnterComment,
    Executing,
    Error,
}

impl ScreenId {
    pub const INITIAL: ScreenId = ScreenId::ChooseProvider;

    pub fn slug(self) -> &'static str {
        match self {
            ScreenId::ChooseProvider => "choose-provider",
            ScreenId::ChooseLocator => "choose-locator",
            ScreenId::ChooseService => "choose-service",
            ScreenId::ChooseCategory => "choose-category",
            ScreenId::ChooseOperation => "choose-operation",
            ScreenId::ChooseTarget => "choose-target",
            ScreenId::ConfirmAction => "confirm-action",
            ScreenId::EnterComment => "enter-comment",
            ScreenId::Executing => "executing",
            ScreenId::Error => "error",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScreenId::ChooseProvider => "Provider",
            ScreenId::ChooseLocator => "Account",
            ScreenId::ChooseService => "Service",
            ScreenId::ChooseCategory => "Category",
            ScreenId::ChooseOperation => "Operation",
            ScreenId::ChooseTarget => "Target",
            ScreenId::ConfirmAction => "Action",
            ScreenId::EnterComment => "Details",
            ScreenId::Executing => "Working",
            ScreenId::Error => "Error",
        }
    }

    /// Static parent in the selection chain.
    ///
    /// Returns `None` for the initial screen and for the two dynamic screens.
    pub fn parent(self) -> Option<ScreenId> {
        match self {
            ScreenId::ChooseProvider | ScreenId::Executing | ScreenId::Error => None,
            ScreenId::ChooseLocator => Some(ScreenId::ChooseProvider),
            ScreenId::ChooseService => Some(ScreenId::ChooseLocator),
            ScreenId::ChooseCategory => Some(ScreenId::ChooseService),
            ScreenId::ChooseOperation => Some(ScreenId::ChooseCategory),
            ScreenId::ChooseTarget => Some(ScreenId::ChooseOperation),
            ScreenId::ConfirmAction => Some(ScreenId::ChooseTarget),
            ScreenId::EnterComment => Some(ScreenId::ConfirmAction),
        }
    }

    /// True for screens that render a selectable list.
    pub fn is_list(self) -> bool {
        !matches!(self, ScreenId::EnterComment | ScreenId::Executing | ScreenId::Error)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// The two sub-steps of the locator screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorStep {
    Profile,
    Region,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_chain_reaches_initial_screen() {
        let mut screen = ScreenId::EnterComment;
        let mut hops = 0;
        while let Some(parent) = screen.parent() {
            screen = parent;
            hops += 1;
        }
        assert_eq!(screen, ScreenId::INITIAL);
        assert_eq!(hops, 7);
    }

    #[test]
    fn dynamic_screens_have_no_static_parent() {
        assert!(ScreenId::Executing.parent().is_none());
        assert!(ScreenId::Error.parent().is_none());
    }
}
