//! The turn-state machine for one encounter.
//!
//! A [`BattleManager`] borrows the hero, the quest being attempted and the
//! RNG for the length of the encounter. The host feeds it one [`Action`] at
//! a time through [`BattleManager::apply_action`]; the monster's reply is
//! resolved inside the same call, so the manager is always waiting on the
//! hero when it returns.
//!
//! Phases:
//! - `Home`: the main action menu.
//! - `UseAbility` / `UseItem`: sub-menus. Opening and closing them is free.
//! - `MonsterDefeated`: the hero may `Continue` to the next monster or
//!   `Retreat`.
//!
//! Rule violations never escape as errors. They come back as
//! [`Outcome::Rejected`] and leave all state untouched.

use crate::abilities::AbilityId;
use crate::combat::{Mitigation, RuleViolation, Strike};
use crate::combatant::Combatant;
use crate::hero::{AbilityOutcome, Hero, PotionEffect};
use crate::items::PotionKind;
use crate::monster::{Monster, MonsterKind};
use crate::quest::Quest;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    HeroTurn,
    MonsterTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Home,
    UseItem,
    UseAbility,
    MonsterDefeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterStatus {
    Ongoing,
    QuestCompleted,
    HeroDefeated,
    Fled,
}

/// One player intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Attack,
    UseAbility(AbilityId),
    UsePotion(PotionKind),
    Rest,
    Flee,
    OpenAbilities,
    OpenItems,
    CloseMenu,
    Continue,
    Retreat,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Attack => "attack",
            Action::UseAbility(_) => "use an ability",
            Action::UsePotion(_) => "use a potion",
            Action::Rest => "rest",
            Action::Flee => "flee",
            Action::OpenAbilities => "open abilities",
            Action::OpenItems => "open items",
            Action::CloseMenu => "close the menu",
            Action::Continue => "continue",
            Action::Retreat => "retreat",
        }
    }
}

/// Result of a single `apply_action` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Rejected(RuleViolation),
    PhaseChanged(Phase),
    /// The hero acted and the monster answered.
    TurnResolved,
    MonsterDefeated {
        kind: MonsterKind,
        experience: u32,
        gold: u32,
        levels_gained: u32,
        quest_complete: bool,
    },
    MonsterAppeared(MonsterKind),
    QuestCompleted,
    HeroDefeated,
    Fled,
}

/// What an encounter amounted to, handed to the quest board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterReport {
    pub quest: String,
    pub status: EncounterStatus,
    pub monsters_slain: Vec<MonsterKind>,
}

// ============================================================================
// Battle log
// ============================================================================

/// Append-only, player-facing record of the encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleLog {
    entries: Vec<String>,
}

impl BattleLog {
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(target: "village_core::battle_log", "{entry}");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

// ============================================================================
// Battle manager
// ============================================================================

pub struct BattleManager<'a, R: Rng + ?Sized> {
    hero: &'a mut Hero,
    quest: &'a mut Quest,
    rng: &'a mut R,
    monster: Option<Monster>,
    turn: Turn,
    phase: Phase,
    status: EncounterStatus,
    log: BattleLog,
    slain: Vec<MonsterKind>,
}

impl<'a, R: Rng + ?Sized> BattleManager<'a, R> {
    /// Start an encounter against the first monster the quest offers.
    /// A quest with nothing left to kill starts already completed.
    pub fn new(hero: &'a mut Hero, quest: &'a mut Quest, rng: &'a mut R) -> Self {
        let monster = quest.get_monster(&mut *rng);
        let mut manager = Self::with_monster(hero, quest, monster, rng);
        if manager.monster.is_none() && manager.quest.is_complete() {
            manager.status = EncounterStatus::QuestCompleted;
            manager.log.push(format!("No monsters remain for {}.", manager.quest.name()));
        }
        manager
    }

    /// Start an encounter against a given monster.
    pub fn with_monster(
        hero: &'a mut Hero,
        quest: &'a mut Quest,
        monster: Option<Monster>,
        rng: &'a mut R,
    ) -> Self {
        let mut log = BattleLog::default();
        if let Some(monster) = &monster {
            log.push(format!("A {} appears!", monster.name()));
        }
        tracing::info!(
            quest = quest.name(),
            hero = hero.name(),
            monster = monster.as_ref().map(|m| m.name()),
            "Encounter started"
        );

        Self {
            hero,
            quest,
            rng,
            monster,
            turn: Turn::HeroTurn,
            phase: Phase::Home,
            status: EncounterStatus::Ongoing,
            log,
            slain: Vec::new(),
        }
    }

    pub fn hero(&self) -> &Hero {
        &*self.hero
    }

    pub fn quest(&self) -> &Quest {
        &*self.quest
    }

    pub fn monster(&self) -> Option<&Monster> {
        self.monster.as_ref()
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != EncounterStatus::Ongoing
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn report(&self) -> EncounterReport {
        EncounterReport {
            quest: self.quest.name().to_string(),
            status: self.status,
            monsters_slain: self.slain.clone(),
        }
    }

    /// Actions the current phase accepts, expanded over the hero's known
    /// abilities and potion kinds.
    pub fn available_actions(&self) -> Vec<Action> {
        if self.is_over() {
            return Vec::new();
        }
        let abilities = self.hero.abilities().iter().map(|a| Action::UseAbility(a.id()));
        let potions = PotionKind::ALL
            .iter()
            .filter(|kind| self.hero.potion_count(**kind) > 0)
            .map(|kind| Action::UsePotion(*kind));

        match self.phase {
            Phase::Home => vec![
                Action::Attack,
                Action::OpenAbilities,
                Action::OpenItems,
                Action::Rest,
                Action::Flee,
            ],
            Phase::UseAbility => abilities
                .chain([Action::CloseMenu, Action::Flee])
                .collect(),
            Phase::UseItem => potions.chain([Action::CloseMenu, Action::Flee]).collect(),
            Phase::MonsterDefeated => vec![Action::Continue, Action::Retreat],
        }
    }

    /// Apply one player action.
    pub fn apply_action(&mut self, action: Action) -> Outcome {
        if let Err(violation) = self.check_allowed(action) {
            tracing::debug!(action = action.label(), %violation, "Action rejected");
            return Outcome::Rejected(violation);
        }

        match action {
            Action::OpenAbilities => self.set_phase(Phase::UseAbility),
            Action::OpenItems => self.set_phase(Phase::UseItem),
            Action::CloseMenu => self.set_phase(Phase::Home),
            Action::Flee | Action::Retreat => self.flee(),
            Action::Continue => self.next_monster(),
            Action::Attack => self.attack(),
            Action::UseAbility(id) => self.use_ability(id),
            Action::UsePotion(kind) => self.use_potion(kind),
            Action::Rest => self.rest(),
        }
    }

    fn check_allowed(&self, action: Action) -> Result<(), RuleViolation> {
        let reason = if self.is_over() {
            Some("the encounter is over")
        } else if self.turn != Turn::HeroTurn {
            Some("it is not the hero's turn")
        } else {
            phase_restriction(self.phase, action)
        };

        match reason {
            Some(reason) => Err(RuleViolation::InvalidAction {
                action: action.label(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn set_phase(&mut self, phase: Phase) -> Outcome {
        self.phase = phase;
        Outcome::PhaseChanged(phase)
    }

    fn has_target(&self) -> bool {
        self.monster.as_ref().is_some_and(|m| m.is_alive())
    }

    fn reject(&mut self, violation: RuleViolation) -> Outcome {
        if matches!(violation, RuleViolation::InvalidAction { .. }) {
            tracing::debug!(%violation, "Action rejected");
        } else {
            tracing::warn!(%violation, "Action rejected");
            self.log.push(violation.to_string());
        }
        Outcome::Rejected(violation)
    }

    // ------------------------------------------------------------------------
    // Hero actions
    // ------------------------------------------------------------------------

    fn attack(&mut self) -> Outcome {
        if !self.has_target() {
            return self.reject(RuleViolation::NoTarget);
        }
        let strike = self.hero.strike(&mut *self.rng);
        let source = self.hero.weapon().name;
        self.land_strike(source, strike);
        self.resolve_turn(None)
    }

    fn use_ability(&mut self, id: AbilityId) -> Outcome {
        if !self.has_target() {
            return self.reject(RuleViolation::NoTarget);
        }
        let outcome = match self.hero.use_ability(id, &mut *self.rng) {
            Ok(outcome) => outcome,
            Err(violation) => return self.reject(violation),
        };

        let hero = self.hero.name().to_string();
        match outcome {
            AbilityOutcome::Strike(strike) => self.land_strike(id.name(), strike),
            AbilityOutcome::Guarded { block, duration } => self.log.push(format!(
                "{hero} uses {id}, blocking {block} damage from the next {duration} attack(s)."
            )),
            AbilityOutcome::Healed(amount) => self
                .log
                .push(format!("{hero} uses {id} and recovers {amount} HP.")),
        }
        self.resolve_turn(Some(id))
    }

    fn use_potion(&mut self, kind: PotionKind) -> Outcome {
        let effect = match self.hero.use_potion(kind) {
            Ok(effect) => effect,
            Err(violation) => return self.reject(violation),
        };

        let hero = self.hero.name().to_string();
        self.log.push(match effect {
            PotionEffect::Healed(amount) => format!("{hero} drinks a {kind} and heals {amount} HP."),
            PotionEffect::DamageBonus(bonus) => {
                format!("{hero} drinks a {kind}. The next hit deals {bonus} extra damage.")
            }
            PotionEffect::BlockBonus(bonus) => {
                format!("{hero} drinks a {kind}. The next blow is reduced by {bonus}.")
            }
        });
        self.resolve_turn(None)
    }

    fn rest(&mut self) -> Outcome {
        let result = self.hero.rest();
        self.log.push(format!(
            "{} rests, recovering {} HP and {} energy.",
            self.hero.name(),
            result.healed,
            result.energy_restored
        ));
        self.resolve_turn(None)
    }

    fn flee(&mut self) -> Outcome {
        self.status = EncounterStatus::Fled;
        self.log.push(format!("{} flees the battle.", self.hero.name()));
        tracing::info!(quest = self.quest.name(), "Hero fled");
        Outcome::Fled
    }

    fn land_strike(&mut self, source: &str, strike: Strike) {
        let Some(monster) = self.monster.as_mut() else {
            return;
        };
        let hero = self.hero.name();

        if !strike.hit {
            self.log
                .push(format!("{hero}'s {source} misses the {}.", monster.name()));
            return;
        }

        let dealt = monster.take_damage(strike.damage);
        let crit = if strike.critical { " Critical hit!" } else { "" };
        self.log.push(format!(
            "{hero}'s {source} hits the {} for {dealt} damage.{crit}",
            monster.name()
        ));
    }

    // ------------------------------------------------------------------------
    // Turn resolution
    // ------------------------------------------------------------------------

    fn resolve_turn(&mut self, used: Option<AbilityId>) -> Outcome {
        self.phase = Phase::Home;
        self.hero.end_turn(used);

        if !self.hero.is_alive() {
            return self.hero_defeated();
        }
        if self.monster.as_ref().is_some_and(|m| !m.is_alive()) {
            return self.monster_defeated();
        }

        self.monster_turn();
        if !self.hero.is_alive() {
            return self.hero_defeated();
        }
        Outcome::TurnResolved
    }

    fn monster_turn(&mut self) {
        self.turn = Turn::MonsterTurn;
        if let Some(monster) = self.monster.as_ref() {
            let name = monster.kind().name();
            let blow = self.hero.receive_blow(monster.damage(), &mut *self.rng);
            let hero = self.hero.name();

            let mut line = format!("The {name} attacks {hero}");
            let reduced = blow.potion_block + blow.guard_block;
            if reduced > 0 {
                line.push_str(&format!(", {reduced} damage is blocked"));
            }
            match blow.mitigation {
                Mitigation::Dodged => line.push_str(&format!(". {hero} dodges!")),
                Mitigation::Blocked { absorbed } => line.push_str(&format!(
                    ". Armor absorbs {absorbed}, {} damage taken.",
                    blow.taken
                )),
                Mitigation::None => line.push_str(&format!(" for {} damage.", blow.taken)),
            }
            self.log.push(line);
        }
        self.turn = Turn::HeroTurn;
    }

    fn monster_defeated(&mut self) -> Outcome {
        let Some(monster) = self.monster.as_ref() else {
            return Outcome::TurnResolved;
        };
        let kind = monster.kind();
        let experience = monster.experience();
        let gold = monster.gold();

        let levels_gained = self.hero.gain_experience(experience);
        self.hero.add_gold(gold);
        self.quest.slay_monster(monster);
        self.slain.push(kind);
        self.phase = Phase::MonsterDefeated;

        self.log.push(format!(
            "The {kind} is defeated! {} gains {experience} experience and {gold} gold.",
            self.hero.name()
        ));
        if levels_gained > 0 {
            self.log.push(format!(
                "{} reached level {}!",
                self.hero.name(),
                self.hero.level()
            ));
        }

        let quest_complete = self.quest.is_complete();
        if quest_complete {
            self.complete_quest();
        }

        Outcome::MonsterDefeated {
            kind,
            experience,
            gold,
            levels_gained,
            quest_complete,
        }
    }

    fn next_monster(&mut self) -> Outcome {
        match self.quest.get_monster(&mut *self.rng) {
            Some(monster) => {
                let kind = monster.kind();
                self.log.push(format!("A {kind} appears!"));
                self.monster = Some(monster);
                self.phase = Phase::Home;
                Outcome::MonsterAppeared(kind)
            }
            None => {
                self.complete_quest();
                Outcome::QuestCompleted
            }
        }
    }

    fn complete_quest(&mut self) {
        self.status = EncounterStatus::QuestCompleted;
        self.log
            .push(format!("Quest complete: {}!", self.quest.name()));
        tracing::info!(quest = self.quest.name(), "Quest requirements met");
    }

    fn hero_defeated(&mut self) -> Outcome {
        self.status = EncounterStatus::HeroDefeated;
        self.log
            .push(format!("{} has been defeated...", self.hero.name()));
        tracing::info!(quest = self.quest.name(), "Hero defeated");
        Outcome::HeroDefeated
    }
}

/// Why `phase` refuses `action`, if it does.
fn phase_restriction(phase: Phase, action: Action) -> Option<&'static str> {
    use Action::*;
    match (phase, action) {
        (Phase::Home, Attack | UseAbility(_) | UsePotion(_) | Rest | Flee)
        | (Phase::Home, OpenAbilities | OpenItems)
        | (Phase::UseAbility, UseAbility(_) | CloseMenu | Flee)
        | (Phase::UseItem, UsePotion(_) | CloseMenu | Flee)
        | (Phase::MonsterDefeated, Continue | Retreat) => None,
        (Phase::Home, CloseMenu) => Some("no menu is open"),
        (Phase::Home, _) => Some("the monster is still standing"),
        (Phase::UseAbility | Phase::UseItem, _) => Some("a menu is open"),
        (Phase::MonsterDefeated, _) => Some("the monster is already defeated"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Resource;
    use crate::hero::HeroClass;
    use crate::items::{Item, WeaponId};
    use crate::village::Penalty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn goblin_quest(count: u32) -> Quest {
        Quest::new(
            "Goblin Hunt",
            "Test quest",
            &[(MonsterKind::Goblin, count)],
            Item::Gold(10),
            Penalty::health(10),
        )
    }

    fn blessed_hero() -> Hero {
        let mut hero = Hero::unequipped("Tester", HeroClass::Warrior, 30);
        hero.equip_weapon(WeaponId::BlessedBlade);
        hero
    }

    #[test]
    fn test_one_hit_kill_defeats_monster() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hero = blessed_hero();
        let mut quest = goblin_quest(2);
        let mut battle = BattleManager::new(&mut hero, &mut quest, &mut rng);

        let outcome = battle.apply_action(Action::Attack);
        assert_eq!(
            outcome,
            Outcome::MonsterDefeated {
                kind: MonsterKind::Goblin,
                experience: 5,
                gold: 3,
                levels_gained: 0,
                quest_complete: false,
            }
        );
        assert_eq!(battle.phase(), Phase::MonsterDefeated);
        assert_eq!(battle.monster().map(|m| m.current_hp()), Some(0));
        assert_eq!(battle.hero().experience(), 5);
        assert_eq!(battle.quest().slain(MonsterKind::Goblin), 1);
        // No counter-attack from a dead goblin
        assert_eq!(battle.hero().current_hp(), 30);
    }

    #[test]
    fn test_menus_do_not_consume_turns() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        let mut quest = goblin_quest(1);
        let mut battle = BattleManager::new(&mut hero, &mut quest, &mut rng);
        let log_len = battle.log().len();

        assert_eq!(
            battle.apply_action(Action::OpenAbilities),
            Outcome::PhaseChanged(Phase::UseAbility)
        );
        assert_eq!(
            battle.apply_action(Action::CloseMenu),
            Outcome::PhaseChanged(Phase::Home)
        );
        assert_eq!(
            battle.apply_action(Action::OpenItems),
            Outcome::PhaseChanged(Phase::UseItem)
        );
        assert_eq!(battle.turn(), Turn::HeroTurn);
        assert_eq!(battle.hero().current_hp(), battle.hero().max_hp());
        assert_eq!(battle.log().len(), log_len);
    }

    #[test]
    fn test_attack_rejected_in_item_menu() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        let mut quest = goblin_quest(1);
        let mut battle = BattleManager::new(&mut hero, &mut quest, &mut rng);
        battle.apply_action(Action::OpenItems);

        let monster_hp = battle.monster().map(|m| m.current_hp());
        let outcome = battle.apply_action(Action::Attack);
        assert!(matches!(
            outcome,
            Outcome::Rejected(RuleViolation::InvalidAction { action: "attack", .. })
        ));
        assert_eq!(battle.monster().map(|m| m.current_hp()), monster_hp);
        assert_eq!(battle.phase(), Phase::UseItem);
    }

    #[test]
    fn test_insufficient_energy_keeps_hero_turn() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        hero.energy = 1;
        let mut quest = goblin_quest(1);
        let mut battle = BattleManager::new(&mut hero, &mut quest, &mut rng);

        let outcome = battle.apply_action(Action::UseAbility(AbilityId::ShieldWall));
        assert_eq!(
            outcome,
            Outcome::Rejected(RuleViolation::InsufficientResource(Resource::Energy {
                required: 2,
                available: 1
            }))
        );
        assert_eq!(battle.hero().energy(), 1);
        assert_eq!(battle.turn(), Turn::HeroTurn);
        assert_eq!(battle.hero().current_hp(), battle.hero().max_hp());
        assert_eq!(
            battle.log().last(),
            Some("Not enough energy (need 2, have 1)")
        );
    }

    #[test]
    fn test_dead_monster_is_no_target() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut hero = blessed_hero();
        let mut quest = goblin_quest(1);
        let corpse = Monster::custom(MonsterKind::Goblin, 0, 2, 0);
        let mut battle = BattleManager::with_monster(&mut hero, &mut quest, Some(corpse), &mut rng);

        assert_eq!(
            battle.apply_action(Action::Attack),
            Outcome::Rejected(RuleViolation::NoTarget)
        );
        assert_eq!(
            battle.apply_action(Action::UseAbility(AbilityId::PowerStrike)),
            Outcome::Rejected(RuleViolation::NoTarget)
        );
        assert_eq!(battle.hero().experience(), 0);
    }

    #[test]
    fn test_flee_ends_without_counter_attack() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        let mut quest = goblin_quest(3);
        let mut battle = BattleManager::new(&mut hero, &mut quest, &mut rng);

        assert_eq!(battle.apply_action(Action::Flee), Outcome::Fled);
        assert_eq!(battle.status(), EncounterStatus::Fled);
        assert_eq!(battle.hero().current_hp(), battle.hero().max_hp());
        assert!(matches!(
            battle.apply_action(Action::Attack),
            Outcome::Rejected(RuleViolation::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_continue_then_quest_completes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut hero = blessed_hero();
        let mut quest = goblin_quest(2);
        let mut battle = BattleManager::new(&mut hero, &mut quest, &mut rng);

        battle.apply_action(Action::Attack);
        assert!(matches!(
            battle.apply_action(Action::Attack),
            Outcome::Rejected(RuleViolation::InvalidAction { .. })
        ));
        assert_eq!(
            battle.apply_action(Action::Continue),
            Outcome::MonsterAppeared(MonsterKind::Goblin)
        );
        assert_eq!(battle.phase(), Phase::Home);

        let outcome = battle.apply_action(Action::Attack);
        assert!(matches!(
            outcome,
            Outcome::MonsterDefeated {
                quest_complete: true,
                ..
            }
        ));
        assert_eq!(battle.status(), EncounterStatus::QuestCompleted);

        let report = battle.report();
        assert_eq!(report.monsters_slain, vec![MonsterKind::Goblin; 2]);
        assert_eq!(report.status, EncounterStatus::QuestCompleted);
    }

    #[test]
    fn test_monster_counter_attacks_after_rest() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut hero = Hero::unequipped("Tester", HeroClass::Warrior, 30);
        let mut quest = goblin_quest(1);
        let goblin = Monster::spawn(MonsterKind::Goblin);
        let mut battle = BattleManager::with_monster(&mut hero, &mut quest, Some(goblin), &mut rng);

        assert_eq!(battle.apply_action(Action::Rest), Outcome::TurnResolved);
        assert_eq!(battle.hero().current_hp(), 28);
        assert_eq!(battle.turn(), Turn::HeroTurn);
    }

    #[test]
    fn test_hero_defeat_ends_encounter() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut hero = Hero::unequipped("Tester", HeroClass::Warrior, 3);
        let mut quest = goblin_quest(1);
        let brute = Monster::custom(MonsterKind::Goblin, 50, 10, 0);
        let mut battle = BattleManager::with_monster(&mut hero, &mut quest, Some(brute), &mut rng);

        assert_eq!(battle.apply_action(Action::Rest), Outcome::HeroDefeated);
        assert_eq!(battle.status(), EncounterStatus::HeroDefeated);
        assert!(battle.available_actions().is_empty());
    }

    #[test]
    fn test_used_ability_blocks_next_turns() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut hero = Hero::unequipped("Tester", HeroClass::Warrior, 100);
        hero.learn_ability(AbilityId::Parry);
        let mut quest = goblin_quest(1);
        let wall = Monster::custom(MonsterKind::Goblin, 1_000, 1, 0);
        let mut battle = BattleManager::with_monster(&mut hero, &mut quest, Some(wall), &mut rng);

        // Parry has cooldown 1: usable again after one other turn
        assert_eq!(
            battle.apply_action(Action::UseAbility(AbilityId::Parry)),
            Outcome::TurnResolved
        );
        assert!(matches!(
            battle.apply_action(Action::UseAbility(AbilityId::Parry)),
            Outcome::Rejected(RuleViolation::InsufficientResource(Resource::Cooldown { .. }))
        ));
        battle.apply_action(Action::Rest);
        assert_eq!(
            battle.apply_action(Action::UseAbility(AbilityId::Parry)),
            Outcome::TurnResolved
        );
    }

    #[test]
    fn test_available_actions_per_phase() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        let mut quest = goblin_quest(1);
        let mut battle = BattleManager::new(&mut hero, &mut quest, &mut rng);

        assert!(battle.available_actions().contains(&Action::Attack));
        battle.apply_action(Action::OpenAbilities);
        let actions = battle.available_actions();
        assert!(actions.contains(&Action::UseAbility(AbilityId::PowerStrike)));
        assert!(!actions.contains(&Action::Attack));
    }
}
