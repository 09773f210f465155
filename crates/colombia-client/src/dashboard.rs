use std::fmt;
use std::str::FromStr;

use colombia_types::models::Member;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Chat,
    Clips,
    Highlights,
    War,
    Admin,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Chat, Tab::Clips, Tab::Highlights, Tab::War, Tab::Admin];

    pub fn key(self) -> &'static str {
        match self {
            Tab::Chat => "chat",
            Tab::Clips => "clips",
            Tab::Highlights => "highlights",
            Tab::War => "war",
            Tab::Admin => "admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Chat => "Chat ao Vivo",
            Tab::Clips => "Clips",
            Tab::Highlights => "Melhores Momentos",
            Tab::War => "Guerra",
            Tab::Admin => "Admin",
        }
    }

    pub fn admin_only(self) -> bool {
        self == Tab::Admin
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tab {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClientError::validation(format!("Aba desconhecida: {}", s.trim())))
    }
}

pub const TAB_USAGE: &str = "Uso: /aba <chat|clips|highlights|war|admin>";

/// Parse a `/aba <key>` line. `None` when the line is not a tab command,
/// so it can be treated as chat input.
pub fn parse_tab_command(line: &str) -> Option<Result<Tab, ClientError>> {
    let mut words = line.split_whitespace();
    if words.next() != Some("/aba") {
        return None;
    }
    Some(match words.next() {
        Some(key) => key.parse(),
        None => Err(ClientError::validation(TAB_USAGE)),
    })
}

/// Static content for the tabs that have no backend yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub note: &'static str,
}

const PLACEHOLDER_NOTE: &str = "Esta seção será implementada com seu backend real.";

/// Tab state for an approved member. Selection is not persisted.
#[derive(Debug, Clone)]
pub struct Dashboard {
    member: Member,
    active: Tab,
}

impl Dashboard {
    /// Only approved members get a dashboard.
    pub fn new(member: Member) -> Result<Self, ClientError> {
        if !member.is_approved {
            return Err(ClientError::NotApproved);
        }
        Ok(Self {
            member,
            active: Tab::Chat,
        })
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_admin(&self) -> bool {
        self.member.role.is_admin()
    }

    /// Tabs shown in the navigation bar, in display order.
    pub fn tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|tab| !tab.admin_only() || self.is_admin())
            .collect()
    }

    /// Switch tabs. Admin-only tabs are refused for everyone else and the
    /// current selection is kept.
    pub fn select(&mut self, tab: Tab) -> Result<(), ClientError> {
        if tab.admin_only() && !self.is_admin() {
            return Err(ClientError::TabUnavailable(tab));
        }
        self.active = tab;
        Ok(())
    }

    pub fn header(&self) -> String {
        if self.is_admin() {
            format!("COLOMBIA | {} [ADMIN]", self.member.nickname)
        } else {
            format!("COLOMBIA | {}", self.member.nickname)
        }
    }

    /// `None` for the chat tab, which has real content.
    pub fn placeholder(&self) -> Option<Placeholder> {
        let title = match self.active {
            Tab::Chat => return None,
            Tab::Clips => "Seção de Clips",
            Tab::Highlights => "Melhores Momentos",
            Tab::War => "Guerra",
            Tab::Admin => "Painel de Administração",
        };
        Some(Placeholder {
            title,
            note: PLACEHOLDER_NOTE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colombia_types::models::Role;

    fn member(role: Role, is_approved: bool) -> Member {
        Member {
            id: "member_1".into(),
            nickname: "Pablito".into(),
            is_approved,
            role,
            user_name: None,
            user_email: None,
            joined_at: None,
            approved_at: None,
            approved_by_name: None,
        }
    }

    #[test]
    fn unapproved_members_get_no_dashboard() {
        assert!(matches!(
            Dashboard::new(member(Role::Admin, false)),
            Err(ClientError::NotApproved)
        ));
    }

    #[test]
    fn starts_on_chat() {
        let dash = Dashboard::new(member(Role::Member, true)).unwrap();
        assert_eq!(dash.active(), Tab::Chat);
        assert!(dash.placeholder().is_none());
    }

    #[test]
    fn admin_tab_only_for_admins() {
        let mut dash = Dashboard::new(member(Role::Member, true)).unwrap();
        assert!(!dash.tabs().contains(&Tab::Admin));
        dash.select(Tab::War).unwrap();
        assert!(matches!(dash.select(Tab::Admin), Err(ClientError::TabUnavailable(Tab::Admin))));
        assert_eq!(dash.active(), Tab::War);
        assert!(!dash.header().contains("ADMIN"));

        let mut admin = Dashboard::new(member(Role::Admin, true)).unwrap();
        assert_eq!(admin.tabs(), Tab::ALL.to_vec());
        admin.select(Tab::Admin).unwrap();
        assert_eq!(admin.placeholder().unwrap().title, "Painel de Administração");
        assert!(admin.header().ends_with("[ADMIN]"));
    }

    #[test]
    fn tabs_parse_from_their_keys() {
        assert_eq!("Highlights".parse::<Tab>().unwrap(), Tab::Highlights);
        assert!("guerra".parse::<Tab>().is_err());
    }

    #[test]
    fn tab_commands_are_told_apart_from_chat() {
        assert_eq!(parse_tab_command("/aba war").unwrap().unwrap(), Tab::War);
        assert_eq!(parse_tab_command("  /aba   clips ").unwrap().unwrap(), Tab::Clips);
        assert!(matches!(
            parse_tab_command("/aba"),
            Some(Err(ClientError::Validation(msg))) if msg == TAB_USAGE
        ));
        assert!(matches!(parse_tab_command("/aba guerra"), Some(Err(_))));
        assert!(parse_tab_command("/abacaxi").is_none());
        assert!(parse_tab_command("bora pra /aba").is_none());
    }
}
