//! The village shop. Gear bought here is equipped on the spot.

use crate::hero::Hero;
use crate::items::{ArmorId, PotionKind, WeaponId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("Not enough gold: costs {cost}, have {gold}")]
    NotEnoughGold { cost: u32, gold: u32 },

    #[error("{0} is not for sale")]
    NotForSale(String),
}

/// What a purchase cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub cost: u32,
    pub gold_left: u32,
}

/// Stock and prices. A shop may carry only part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    weapons: Vec<WeaponId>,
    armors: Vec<ArmorId>,
}

impl Default for Shop {
    fn default() -> Self {
        Self::new()
    }
}

impl Shop {
    /// A shop stocking the whole catalog.
    pub fn new() -> Self {
        Self {
            weapons: WeaponId::ALL.to_vec(),
            armors: ArmorId::ALL.to_vec(),
        }
    }

    pub fn with_stock(weapons: Vec<WeaponId>, armors: Vec<ArmorId>) -> Self {
        Self { weapons, armors }
    }

    pub fn weapons(&self) -> &[WeaponId] {
        &self.weapons
    }

    pub fn armors(&self) -> &[ArmorId] {
        &self.armors
    }

    pub fn buy_potion(
        &self,
        hero: &mut Hero,
        kind: PotionKind,
        count: u32,
    ) -> Result<Receipt, ShopError> {
        let cost = kind.price().saturating_mul(count);
        let receipt = charge(hero, cost)?;
        hero.add_potions(kind, count);
        tracing::info!(potion = %kind, count, cost, "Bought potions");
        Ok(receipt)
    }

    pub fn buy_weapon(&self, hero: &mut Hero, id: WeaponId) -> Result<Receipt, ShopError> {
        if !self.weapons.contains(&id) {
            return Err(ShopError::NotForSale(id.name().to_string()));
        }
        let receipt = charge(hero, id.weapon().price)?;
        hero.equip_weapon(id);
        tracing::info!(weapon = %id, cost = receipt.cost, "Bought weapon");
        Ok(receipt)
    }

    pub fn buy_armor(&self, hero: &mut Hero, id: ArmorId) -> Result<Receipt, ShopError> {
        if !self.armors.contains(&id) {
            return Err(ShopError::NotForSale(id.name().to_string()));
        }
        let receipt = charge(hero, id.armor().price)?;
        hero.equip_armor(id);
        tracing::info!(armor = %id, cost = receipt.cost, "Bought armor");
        Ok(receipt)
    }
}

fn charge(hero: &mut Hero, cost: u32) -> Result<Receipt, ShopError> {
    if !hero.spend_gold(cost) {
        tracing::warn!(cost, gold = hero.gold(), "Purchase refused");
        return Err(ShopError::NotEnoughGold {
            cost,
            gold: hero.gold(),
        });
    }
    Ok(Receipt {
        cost,
        gold_left: hero.gold(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::HeroClass;

    #[test]
    fn test_buy_potions() {
        let shop = Shop::new();
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        let receipt = shop.buy_potion(&mut hero, PotionKind::HealthPotion, 2).unwrap();
        assert_eq!(receipt, Receipt { cost: 20, gold_left: 0 });
        assert_eq!(hero.potion_count(PotionKind::HealthPotion), 4);
    }

    #[test]
    fn test_not_enough_gold_changes_nothing() {
        let shop = Shop::new();
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        let err = shop.buy_weapon(&mut hero, WeaponId::BlessedBlade).unwrap_err();
        assert_eq!(err, ShopError::NotEnoughGold { cost: 150, gold: 20 });
        assert_eq!(hero.gold(), 20);
        assert_eq!(hero.weapon_id(), Some(WeaponId::ShortSword));
    }

    #[test]
    fn test_gear_is_equipped() {
        let shop = Shop::new();
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        hero.add_gold(100);
        shop.buy_weapon(&mut hero, WeaponId::Longsword).unwrap();
        shop.buy_armor(&mut hero, ArmorId::LeatherArmor).unwrap();
        assert_eq!(hero.weapon_id(), Some(WeaponId::Longsword));
        assert_eq!(hero.armor_id(), Some(ArmorId::LeatherArmor));
        assert_eq!(hero.gold(), 30);
    }

    #[test]
    fn test_out_of_stock() {
        let shop = Shop::with_stock(vec![WeaponId::Dagger], vec![]);
        let mut hero = Hero::new("Aldric", HeroClass::Warrior);
        assert_eq!(
            shop.buy_armor(&mut hero, ArmorId::ClothTunic),
            Err(ShopError::NotForSale("Cloth Tunic".to_string()))
        );
    }
}
