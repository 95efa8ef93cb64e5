//! Type-changing actors: transform, countdown and delayed transform.

use crate::actor::{ConfigError, ConfigRecord, ItemInfo, ItemUseActor, UseContext, UseResult};
use crate::agent::{FIRE_SOURCE, MessageKind};
use crate::env::ActorEnv;
use crate::state::{Item, ItemTypeId, Position, Tick};

use super::known_item;

/// Turns the item into another type, optionally inside a container.
#[derive(Clone, Debug)]
pub struct TransformActor {
    pub msg_transform: String,
    pub target: ItemTypeId,
    /// Charges set on the result; negative leaves them unchanged.
    pub ammo_qty: i64,
    pub ammo_type: Option<ItemTypeId>,
    /// When set the item becomes this container holding the target.
    pub container: Option<ItemTypeId>,
    pub active: bool,
    /// Countdown for the result; 0 uses the target's own interval.
    pub countdown: u32,
    pub moves: i32,
    /// Fire charges consumed from the agent's tools.
    pub need_fire: i64,
    pub need_fire_msg: String,
    /// Minimum charges the item must hold.
    pub need_charges: i64,
    pub need_charges_msg: Option<String>,
    pub menu_text: String,
}

impl Default for TransformActor {
    fn default() -> Self {
        Self {
            msg_transform: String::new(),
            target: ItemTypeId::default(),
            ammo_qty: -1,
            ammo_type: None,
            container: None,
            active: false,
            countdown: 0,
            moves: 0,
            need_fire: 0,
            need_fire_msg: "You need a source of fire!".to_owned(),
            need_charges: 0,
            need_charges_msg: None,
            menu_text: String::new(),
        }
    }
}

impl TransformActor {
    /// Applies the transformation unconditionally.
    pub fn transform(&self, ctx: &mut UseContext<'_>, item: &mut Item) -> UseResult {
        let interval = ctx.env.item_type(&self.target)?.countdown_interval;
        ctx.msg(MessageKind::Info, &self.msg_transform);
        ctx.agent.mod_moves(-self.moves);

        match &self.container {
            None => {
                item.convert(self.target.clone());
                self.prime(item, interval);
            }
            Some(container) => {
                item.convert(container.clone());
                let mut inner = Item::new(self.target.clone(), ctx.turn);
                self.prime(&mut inner, interval);
                item.contents.push(inner);
            }
        }
        Ok(0)
    }

    fn prime(&self, obj: &mut Item, interval: u32) {
        if self.ammo_qty >= 0 {
            obj.charges = self.ammo_qty;
            obj.ammo_current = self.ammo_type.clone();
        }
        if self.countdown > 0 {
            obj.item_counter = self.countdown;
        } else if obj.item_counter == 0 {
            obj.item_counter = interval;
        }
        obj.active = self.active || obj.item_counter > 0;
    }

    fn empty_message(&self, ctx: &UseContext<'_>, item: &Item) -> String {
        self.need_charges_msg
            .clone()
            .unwrap_or_else(|| format!("The {} is empty!", ctx.item_name(item)))
    }
}

impl ItemUseActor for TransformActor {
    fn type_tag(&self) -> &'static str {
        "transform"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.target = ItemTypeId::new(record.require_str("target")?);
        self.msg_transform = record.get_string("msg", "")?;
        self.container = record.get_str("container")?.map(ItemTypeId::new);
        self.ammo_qty = record.get_int("ammo_qty", self.ammo_qty)?;
        self.ammo_type = record.get_str("ammo_type")?.map(ItemTypeId::new);
        self.countdown = record.get_u32("countdown", self.countdown)?;
        self.active = record.get_bool("active", self.active)?;
        self.moves = record.get_i32("moves", self.moves)?;
        if self.moves < 0 {
            return Err(ConfigError::invalid("moves", "a non-negative integer"));
        }
        self.need_fire = record.get_int("need_fire", self.need_fire)?;
        self.need_fire_msg = record.get_string("need_fire_msg", &self.need_fire_msg)?;
        self.need_charges = record.get_int("need_charges", self.need_charges)?;
        self.need_charges_msg = record.get_str("need_charges_msg")?;
        self.menu_text = record.get_string("menu_text", "")?;
        Ok(())
    }

    fn finalize(&mut self, _item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        known_item(env, "target", &self.target)?;
        if let Some(container) = &self.container {
            known_item(env, "container", container)?;
        }
        if self.ammo_qty >= 0 && self.ammo_type.is_none() {
            let items = env.items()?;
            self.ammo_type = items
                .item_type(&self.target)
                .and_then(|ty| ty.uses_ammo.as_ref())
                .and_then(|ammo| items.default_ammo(ammo))
                .cloned();
        }
        if let Some(ammo) = &self.ammo_type {
            known_item(env, "ammo_type", ammo)?;
        }
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        if item.charges < self.need_charges {
            let text = self.empty_message(ctx, item);
            return ctx.insufficient(text);
        }
        if self.need_fire > 0 {
            if ctx.agent.is_underwater() {
                return ctx.precondition("You can't do that while underwater.");
            }
            let fire = ItemTypeId::new(FIRE_SOURCE);
            if !ctx.agent.use_charges_if_avail(&fire, self.need_fire) {
                let text = self.need_fire_msg.clone();
                return ctx.insufficient(text);
            }
        }
        self.transform(ctx, item)
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        if item.charges < self.need_charges {
            return false;
        }
        if self.need_fire > 0 {
            let fire = ItemTypeId::new(FIRE_SOURCE);
            return !ctx.agent.is_underwater() && ctx.agent.has_charges(&fire, self.need_fire);
        }
        true
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, _item: &Item, env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let mut lines = vec![ItemInfo::new(
            "Turns into",
            env.item_name(&self.target),
        )];
        if let Some(container) = &self.container {
            lines.push(ItemInfo::new("Container", env.item_name(container)));
        }
        if self.countdown > 0 {
            lines.push(ItemInfo::new("Countdown", format!("{} turns", self.countdown)));
        }
        lines
    }

    fn name(&self) -> String {
        if self.menu_text.is_empty() {
            "Activate".to_owned()
        } else {
            self.menu_text.clone()
        }
    }
}

/// Starts the item's countdown.
#[derive(Clone, Debug, Default)]
pub struct CountdownActor {
    pub name: String,
    /// Turns until the countdown fires; 0 uses the item type's interval.
    pub interval: u32,
    pub message: String,
}

impl ItemUseActor for CountdownActor {
    fn type_tag(&self) -> &'static str {
        "countdown"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.name = record.get_string("name", "")?;
        self.interval = record.get_u32("interval", 0)?;
        self.message = record.get_string("message", "")?;
        Ok(())
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        _auto: bool,
        _pos: Position,
    ) -> UseResult {
        if item.active {
            let text = format!("The {} is already counting down.", ctx.item_name(item));
            return ctx.precondition(text);
        }
        item.item_counter = if self.interval > 0 {
            self.interval
        } else {
            ctx.env.item_type(&item.type_id)?.countdown_interval
        };
        item.active = true;
        ctx.msg(MessageKind::Info, &self.message);
        Ok(0)
    }

    fn can_use(&self, _ctx: &UseContext<'_>, item: &Item, _auto: bool, _pos: Position) -> bool {
        !item.active
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, item: &Item, env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let interval = if self.interval > 0 {
            self.interval
        } else {
            env.item_type(&item.type_id)
                .map(|ty| ty.countdown_interval)
                .unwrap_or(0)
        };
        vec![ItemInfo::new("Countdown", format!("{interval} turns"))]
    }

    fn name(&self) -> String {
        if self.name.is_empty() {
            "Activate".to_owned()
        } else {
            self.name.clone()
        }
    }
}

/// Transform that only works once the item is old enough.
#[derive(Clone, Debug)]
pub struct DelayedTransformActor {
    pub transform: TransformActor,
    /// Required age in turns.
    pub transform_age: i64,
    pub not_ready_msg: String,
}

impl Default for DelayedTransformActor {
    fn default() -> Self {
        Self {
            transform: TransformActor::default(),
            transform_age: 0,
            not_ready_msg: "It's not ready yet.".to_owned(),
        }
    }
}

impl DelayedTransformActor {
    /// Turns left before the item may transform; zero or less means ready.
    pub fn time_to_do(&self, item: &Item, now: Tick) -> i64 {
        self.transform_age - item.age(now)
    }
}

impl ItemUseActor for DelayedTransformActor {
    fn type_tag(&self) -> &'static str {
        "delayed_transform"
    }

    fn load(&mut self, record: &ConfigRecord) -> Result<(), ConfigError> {
        self.transform.load(record)?;
        self.transform_age = record.get_int("transform_age", 0)?;
        self.not_ready_msg = record.get_string("not_ready_msg", &self.not_ready_msg)?;
        Ok(())
    }

    fn finalize(&mut self, item_type: &ItemTypeId, env: ActorEnv<'_>) -> Result<(), ConfigError> {
        self.transform.finalize(item_type, env)
    }

    fn use_item(
        &self,
        ctx: &mut UseContext<'_>,
        item: &mut Item,
        auto: bool,
        pos: Position,
    ) -> UseResult {
        if self.time_to_do(item, ctx.turn) > 0 {
            let text = self.not_ready_msg.clone();
            return ctx.precondition(text);
        }
        self.transform.use_item(ctx, item, auto, pos)
    }

    fn can_use(&self, ctx: &UseContext<'_>, item: &Item, auto: bool, pos: Position) -> bool {
        self.transform.can_use(ctx, item, auto, pos)
    }

    fn clone_actor(&self) -> Box<dyn ItemUseActor> {
        Box::new(self.clone())
    }

    fn info(&self, item: &Item, env: ActorEnv<'_>) -> Vec<ItemInfo> {
        let mut lines = self.transform.info(item, env);
        lines.push(ItemInfo::new(
            "Ready after",
            format!("{} turns", self.transform_age),
        ));
        lines
    }

    fn name(&self) -> String {
        self.transform.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::UseError;
    use crate::actor::kinds::testing::{Harness, actor};
    use crate::agent::Inventory;

    fn grenade_pin() -> ConfigRecord {
        ConfigRecord::new("transform")
            .with("target", "grenade_act")
            .with("msg", "You pull the pin on the grenade.")
            .with("active", true)
            .with("moves", 50)
    }

    #[test]
    fn transform_converts_and_arms() {
        let actor = actor("grenade", grenade_pin());
        let mut h = Harness::new();
        let mut grenade = Item::new("grenade", Tick::ZERO);

        assert_eq!(h.run(actor.as_ref(), &mut grenade), Ok(0));
        assert_eq!(grenade.type_id, ItemTypeId::new("grenade_act"));
        assert!(grenade.active);
        assert_eq!(grenade.item_counter, 5);
        assert_eq!(h.you.moves, 50);
        assert!(h.you.said("pull the pin"));
    }

    #[test]
    fn too_few_charges_changes_nothing() {
        let record = ConfigRecord::new("transform")
            .with("target", "flashlight_on")
            .with("need_charges", 1)
            .with("active", true);
        let actor = actor("flashlight", record);
        let mut h = Harness::new();
        let mut light = Item::new("flashlight", Tick::ZERO).with_charges(0);
        let before = light.clone();

        assert!(!h.can_use(actor.as_ref(), &light));
        let result = h.run(actor.as_ref(), &mut light);

        assert!(matches!(result, Err(UseError::Insufficient(_))));
        assert_eq!(light, before);
        assert!(h.you.said("is empty"));
    }

    #[test]
    fn ammo_qty_resolves_default_ammo() {
        let record = ConfigRecord::new("transform")
            .with("target", "flashlight")
            .with("ammo_qty", 0);
        let actor = actor("flashlight_on", record);
        let mut h = Harness::new();
        let mut light = Item::new("flashlight_on", Tick::ZERO).with_charges(40);

        h.run(actor.as_ref(), &mut light).unwrap();

        assert_eq!(light.charges, 0);
        assert_eq!(light.ammo_current, Some(ItemTypeId::new("battery")));
    }

    #[test]
    fn container_receives_target() {
        let record = ConfigRecord::new("transform")
            .with("target", "can_food")
            .with("container", "tin_can");
        let actor = actor("can_food_sealed", record);
        let mut h = Harness::new();
        let mut can = Item::new("can_food_sealed", Tick::ZERO);

        h.run(actor.as_ref(), &mut can).unwrap();

        assert_eq!(can.type_id, ItemTypeId::new("tin_can"));
        assert_eq!(can.contents.len(), 1);
        assert_eq!(can.contents[0].type_id, ItemTypeId::new("can_food"));
    }

    #[test]
    fn fire_is_consumed_and_required() {
        let record = ConfigRecord::new("transform")
            .with("target", "torch_lit")
            .with("need_fire", 2)
            .with("active", true);
        let actor = actor("torch", record);

        let mut h = Harness::new();
        let mut torch = Item::new("torch", Tick::ZERO);
        assert!(matches!(
            h.run(actor.as_ref(), &mut torch),
            Err(UseError::Insufficient(_))
        ));
        assert_eq!(torch.type_id, ItemTypeId::new("torch"));

        h.you = h.you.clone().with_pseudo_charges(FIRE_SOURCE, 3);
        h.run(actor.as_ref(), &mut torch).unwrap();
        assert_eq!(torch.type_id, ItemTypeId::new("torch_lit"));
        assert_eq!(h.you.charges_of(&ItemTypeId::new(FIRE_SOURCE)), 1);
    }

    #[test]
    fn unknown_target_fails_finalize() {
        let record = ConfigRecord::new("transform").with("target", "unobtainium");
        let mut actor = crate::actor::ActorRegistry::with_builtin()
            .instantiate(&record)
            .unwrap();
        let content = crate::sandbox::fixtures::content();
        let err = actor
            .finalize(&ItemTypeId::new("grenade"), content.env())
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownReference { .. }));
    }

    #[test]
    fn negative_moves_are_rejected() {
        let mut actor = TransformActor::default();
        let record = ConfigRecord::new("transform")
            .with("target", "grenade_act")
            .with("moves", -5);
        assert!(matches!(
            actor.load(&record),
            Err(ConfigError::InvalidField { .. })
        ));
    }

    #[test]
    fn countdown_starts_once() {
        let actor = actor(
            "grenade_act",
            ConfigRecord::new("countdown").with("message", "Tick tock."),
        );
        let mut h = Harness::new();
        let mut grenade = Item::new("grenade_act", Tick::ZERO);

        assert!(h.can_use(actor.as_ref(), &grenade));
        h.run(actor.as_ref(), &mut grenade).unwrap();
        assert!(grenade.active);
        assert_eq!(grenade.item_counter, 5);
        assert!(!h.can_use(actor.as_ref(), &grenade));
        assert!(h.run(actor.as_ref(), &mut grenade).is_err());
    }

    fn smoking_rack() -> Box<dyn ItemUseActor> {
        actor(
            "meat_raw",
            ConfigRecord::new("delayed_transform")
                .with("target", "meat_smoked")
                .with("transform_age", 600)
                .with("not_ready_msg", "The meat needs more time."),
        )
    }

    #[test]
    fn time_to_do_decreases_with_age() {
        let delayed = DelayedTransformActor {
            transform_age: 600,
            ..Default::default()
        };
        let meat = Item::new("meat_raw", Tick(100));
        let mut last = i64::MAX;
        for now in [100, 200, 500, 700, 1000] {
            let left = delayed.time_to_do(&meat, Tick(now));
            assert!(left < last);
            last = left;
        }
        assert_eq!(delayed.time_to_do(&meat, Tick(700)), 0);
    }

    #[test]
    fn delayed_transform_waits() {
        let actor = smoking_rack();
        let mut h = Harness::new();
        h.turn = Tick(500);
        let mut meat = Item::new("meat_raw", Tick(100));

        assert!(matches!(
            h.run(actor.as_ref(), &mut meat),
            Err(UseError::Precondition(_))
        ));
        assert_eq!(meat.type_id, ItemTypeId::new("meat_raw"));
        assert!(h.you.said("needs more time"));

        h.turn = Tick(700);
        h.run(actor.as_ref(), &mut meat).unwrap();
        assert_eq!(meat.type_id, ItemTypeId::new("meat_smoked"));
    }
}
