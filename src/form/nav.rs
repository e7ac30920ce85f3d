#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Dashboard,
    Mine,
    Create,
    All,
    Reports,
    Detail,
}

impl NavLink {
    pub const ALL: [NavLink; 6] = [
        NavLink::Dashboard,
        NavLink::Mine,
        NavLink::Create,
        NavLink::All,
        NavLink::Reports,
        NavLink::Detail,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Mine => "My tickets",
            Self::Create => "Create ticket",
            Self::All => "All tickets",
            Self::Reports => "Reports",
            Self::Detail => "Ticket detail",
        }
    }

    /// Server-rendered page this link opens in the browser, if it is not an in-app page.
    pub fn server_path(&self) -> Option<&'static str> {
        match self {
            Self::Dashboard => Some("/app/dashboard"),
            Self::Mine => Some("/app/mine"),
            Self::All => Some("/app/all"),
            Self::Reports => Some("/app/reports"),
            Self::Create | Self::Detail => None,
        }
    }
}

/// Collapsible navigation panel.
#[derive(Debug, Clone, Default)]
pub struct NavMenu {
    open: bool,
    pub selected: usize,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the panel; returns the new expanded state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % NavLink::ALL.len();
    }

    pub fn prev(&mut self) {
        self.selected = (self.selected + NavLink::ALL.len() - 1) % NavLink::ALL.len();
    }

    /// Follow the highlighted link. Any link click closes the panel.
    pub fn activate(&mut self) -> NavLink {
        self.close();
        NavLink::ALL[self.selected]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_reports_expanded_state() {
        let mut nav = NavMenu::default();
        assert!(nav.toggle());
        assert!(nav.is_open());
        assert!(!nav.toggle());
    }

    #[test]
    fn test_activating_a_link_closes_the_panel() {
        let mut nav = NavMenu::default();
        nav.toggle();
        nav.next();
        nav.next();
        assert_eq!(nav.activate(), NavLink::Create);
        assert!(!nav.is_open());
    }

    #[test]
    fn test_prev_wraps() {
        let mut nav = NavMenu::default();
        nav.prev();
        assert_eq!(NavLink::ALL[nav.selected], NavLink::Detail);
    }
}
