use super::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Describe,
    Classify,
    Attach,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Describe, Step::Classify, Step::Attach, Step::Review];

    pub fn number(&self) -> usize {
        match self {
            Self::Describe => 1,
            Self::Classify => 2,
            Self::Attach => 3,
            Self::Review => 4,
        }
    }

    pub fn from_number(n: usize) -> Option<Self> {
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Describe => "Describe the problem",
            Self::Classify => "Classify",
            Self::Attach => "Attachments",
            Self::Review => "Review & submit",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Fields that take keyboard focus inside this step.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Describe => &[Field::Title, Field::Description],
            Self::Classify => &[Field::Category, Field::Department, Field::Priority],
            Self::Attach | Self::Review => &[],
        }
    }
}

/// Accordion of wizard steps. At most one step is open at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    open: Option<Step>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            open: Some(Step::Describe),
        }
    }
}

impl Wizard {
    pub fn open_step(&self) -> Option<Step> {
        self.open
    }

    pub fn is_open(&self, step: Step) -> bool {
        self.open == Some(step)
    }

    /// Open `step` and close every other one.
    pub fn open(&mut self, step: Step) {
        self.open = Some(step);
    }

    /// Step that Next would open, if any.
    pub fn next_target(&self) -> Option<Step> {
        self.open.and_then(|s| s.next())
    }

    pub fn next(&mut self) -> Option<Step> {
        let target = self.next_target()?;
        self.open(target);
        Some(target)
    }

    pub fn prev(&mut self) -> Option<Step> {
        let target = self.open.and_then(|s| s.prev())?;
        self.open(target);
        Some(target)
    }

    /// Step header activation: opens a closed step exclusively, collapses the open one.
    pub fn toggle_header(&mut self, step: Step) {
        if self.open == Some(step) {
            self.open = None;
        } else {
            self.open = Some(step);
        }
    }
}
