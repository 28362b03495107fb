//! Filtered, ordered views over the player arena.

use futures_util::future::join_all;
use lycan_transport::{ChatTransport, TransportError};

use crate::{Faction, Player, PlayerIndex, Role, RoleGroup};

/// What a [`PlayerSet`] query matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Player(PlayerIndex),
    Role(Role),
    Group(RoleGroup),
    Faction(Faction),
}

impl Selector {
    fn matches(self, player: &Player) -> bool {
        match self {
            Self::Player(index) => player.index() == index,
            Self::Role(role) => player.role() == role,
            Self::Group(group) => player.group() == group,
            Self::Faction(faction) => player.faction() == faction,
        }
    }
}

impl From<PlayerIndex> for Selector {
    fn from(index: PlayerIndex) -> Self {
        Self::Player(index)
    }
}

impl From<&Player> for Selector {
    fn from(player: &Player) -> Self {
        Self::Player(player.index())
    }
}

impl From<Role> for Selector {
    fn from(role: Role) -> Self {
        Self::Role(role)
    }
}

impl From<RoleGroup> for Selector {
    fn from(group: RoleGroup) -> Self {
        Self::Group(group)
    }
}

impl From<Faction> for Selector {
    fn from(faction: Faction) -> Self {
        Self::Faction(faction)
    }
}

/// A set of players, sorted by user id.
///
/// The order is what players see in numbered prompts, so a selection
/// `"3"` always means the third entry of [`PlayerSet::show`]. Every
/// query returns a new set; members are never mutated through it.
#[derive(Debug, Clone, Default)]
pub struct PlayerSet<'a> {
    members: Vec<&'a Player>,
}

impl<'a> PlayerSet<'a> {
    pub fn new(players: impl IntoIterator<Item = &'a Player>) -> Self {
        let mut members: Vec<&'a Player> = players.into_iter().collect();
        members.sort_by(|a, b| a.user_id().cmp(b.user_id()));
        members.dedup_by_key(|p| p.index());
        Self { members }
    }

    fn filtered(&self, keep: impl Fn(&Player) -> bool) -> Self {
        Self {
            members: self.members.iter().copied().filter(|p| keep(p)).collect(),
        }
    }

    pub fn alive(&self) -> Self {
        self.filtered(Player::is_alive)
    }

    pub fn dead(&self) -> Self {
        self.filtered(|p| !p.is_alive())
    }

    /// Players whose departed signal has fired.
    pub fn departed(&self) -> Self {
        self.filtered(Player::has_departed)
    }

    pub fn select(&self, selector: impl Into<Selector>) -> Self {
        let selector = selector.into();
        self.filtered(|p| selector.matches(p))
    }

    pub fn exclude(&self, selector: impl Into<Selector>) -> Self {
        let selector = selector.into();
        self.filtered(|p| !selector.matches(p))
    }

    /// Members of `self` that are not in `other`.
    pub fn without(&self, other: &PlayerSet<'_>) -> Self {
        self.filtered(|p| !other.contains(p.index()))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, index: PlayerIndex) -> bool {
        self.members.iter().any(|p| p.index() == index)
    }

    /// Zero-based lookup.
    pub fn get(&self, position: usize) -> Option<&'a Player> {
        self.members.get(position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Player> + '_ {
        self.members.iter().copied()
    }

    pub fn indices(&self) -> Vec<PlayerIndex> {
        self.members.iter().map(|p| p.index()).collect()
    }

    /// Distinct, non-empty `selected` values, in member order.
    pub fn selections(&self) -> Vec<PlayerIndex> {
        let mut picks = Vec::new();
        for pick in self.members.iter().filter_map(|p| p.selected()) {
            if !picks.contains(&pick) {
                picks.push(pick);
            }
        }
        picks
    }

    /// Comma-separated display names.
    pub fn names(&self) -> String {
        self.members
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Numbered listing, one player per line, starting at 1.
    pub fn show(&self) -> String {
        self.members
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p.name()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Sends `text` privately to every member, concurrently.
    ///
    /// Every send is attempted; the first failure is returned.
    pub async fn broadcast(
        &self,
        transport: &dyn ChatTransport,
        text: &str,
    ) -> Result<(), TransportError> {
        let targets: Vec<_> = self.members.iter().map(|p| p.target()).collect();
        let results = join_all(targets.iter().map(|t| transport.send_text(t, text))).await;
        results.into_iter().try_for_each(|r| r.map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KillInfo, KillReason};
    use lycan_protocol::UserId;

    fn table() -> Vec<Player> {
        [
            ("u3", "Carol", Role::Witch),
            ("u1", "Alice", Role::Werewolf),
            ("u4", "Dave", Role::Civilian),
            ("u2", "Bob", Role::WolfKing),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (id, name, role))| {
            Player::new(PlayerIndex(i), UserId::from(id), name.into(), role)
        })
        .collect()
    }

    #[test]
    fn test_player_set_sorted_by_user_id() {
        let players = table();
        let set = PlayerSet::new(&players);
        assert_eq!(set.names(), "Alice, Bob, Carol, Dave");
        assert_eq!(set.show(), "1. Alice\n2. Bob\n3. Carol\n4. Dave");
        assert_eq!(set.get(2).map(Player::name), Some("Carol"));
        assert!(set.get(4).is_none());
    }

    #[test]
    fn test_player_set_select_and_exclude() {
        let players = table();
        let set = PlayerSet::new(&players);
        assert_eq!(set.select(RoleGroup::Werewolf).names(), "Alice, Bob");
        assert_eq!(set.select(Role::WolfKing).names(), "Bob");
        assert_eq!(set.exclude(Faction::Werewolf).names(), "Carol, Dave");
        assert_eq!(set.exclude(&players[0]).len(), 3);
        assert!(!set.exclude(PlayerIndex(0)).contains(PlayerIndex(0)));
    }

    #[test]
    fn test_player_set_alive_dead_and_difference() {
        let players = table();
        players[2].mark_dead(KillInfo {
            reason: KillReason::Werewolf,
            killers: vec![],
        });
        let set = PlayerSet::new(&players);
        assert_eq!(set.alive().names(), "Alice, Bob, Carol");
        assert_eq!(set.dead().names(), "Dave");
        let wolves = set.select(Faction::Werewolf);
        assert_eq!(set.without(&wolves).names(), "Carol, Dave");
        assert!(set.departed().is_empty());
    }

    #[test]
    fn test_player_set_selections_are_distinct() {
        let players = table();
        players[1].set_selected(Some(PlayerIndex(2)));
        players[3].set_selected(Some(PlayerIndex(2)));
        let set = PlayerSet::new(&players);
        assert_eq!(set.selections(), vec![PlayerIndex(2)]);
        players[3].set_selected(Some(PlayerIndex(0)));
        assert_eq!(set.selections(), vec![PlayerIndex(2), PlayerIndex(0)]);
    }

    #[test]
    fn test_player_set_new_dedups() {
        let players = table();
        let set = PlayerSet::new(players.iter().chain(players.iter()));
        assert_eq!(set.len(), 4);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_member() {
        let players = table();
        let (transport, mut rx) = lycan_transport::MemoryTransport::new();
        let wolves = PlayerSet::new(&players).select(Faction::Werewolf);
        wolves.broadcast(&transport, "hunt").await.unwrap();
        let mut targets = vec![rx.recv().await.unwrap().target, rx.recv().await.unwrap().target];
        targets.sort_by_key(|t| t.to_string());
        assert_eq!(
            targets,
            vec![
                lycan_protocol::Target::User(UserId::from("u1")),
                lycan_protocol::Target::User(UserId::from("u2")),
            ]
        );
    }
}
