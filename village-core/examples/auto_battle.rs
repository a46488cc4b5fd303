//! Plays through every quest with a simple scripted hero.
//!
//! Run with: `RUST_LOG=village_core=debug cargo run -p village-core --example auto_battle`
//! Set `VILLAGE_SEED` for a reproducible run.

use village_core::abilities::AbilityEffect;
use village_core::{
    Action, BattleManager, Combatant, GameConfig, GameSession, HeroClass, Outcome, Phase,
    PotionKind, QuestResolution,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::from_env("Aldric").with_class(HeroClass::Warrior);
    let mut session = GameSession::new(config);

    println!("=== Village Defense ===\n");

    let quests: Vec<String> = session
        .board()
        .available()
        .iter()
        .map(|q| q.name().to_string())
        .collect();

    for name in quests {
        if session.is_game_over() {
            break;
        }
        println!("--- {name} ---");

        let report = {
            let mut battle = session.embark(&name)?;
            while !battle.is_over() {
                let action = choose_action(&battle);
                if let Outcome::Rejected(reason) = battle.apply_action(action) {
                    println!("  (rejected: {reason})");
                    battle.apply_action(Action::Attack);
                }
            }
            for line in battle.log().iter() {
                println!("  {line}");
            }
            battle.report()
        };

        match session.conclude(&report)? {
            QuestResolution::Completed { quest, reward } => {
                println!("Completed {quest}, received {reward}\n")
            }
            QuestResolution::Failed { quest, penalty } => {
                println!(
                    "Failed {quest}, village loses {} ({:?})\n",
                    penalty.magnitude, penalty.target
                )
            }
        }

        if session.hero().gold() >= PotionKind::HealthPotion.price() {
            session.buy_potion(PotionKind::HealthPotion, 1)?;
        }
        session.hero_mut().rest();
    }

    let hero = session.hero();
    let village = session.village();
    println!(
        "{} finished at level {} with {} gold. Village health {}/{}, supplies {}.",
        hero.name(),
        hero.level(),
        hero.gold(),
        village.health,
        village.max_health,
        village.supplies
    );

    let path = session.save().await?;
    println!("Saved to {}", path.display());
    Ok(())
}

fn choose_action<R: rand::Rng + ?Sized>(battle: &BattleManager<'_, R>) -> Action {
    let hero = battle.hero();
    if battle.phase() == Phase::MonsterDefeated {
        return Action::Continue;
    }
    if hero.current_hp() * 10 < hero.max_hp() * 3 {
        if hero.potion_count(PotionKind::HealthPotion) > 0 {
            return Action::UsePotion(PotionKind::HealthPotion);
        }
        return Action::Rest;
    }

    let ready = hero.abilities().iter().find(|a| {
        a.can_use()
            && a.spec().energy_cost <= hero.energy()
            && matches!(a.spec().effect, AbilityEffect::Attack(_))
    });
    match ready {
        Some(ability) => Action::UseAbility(ability.id()),
        None => Action::Attack,
    }
}
