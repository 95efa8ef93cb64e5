use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::agent::{Activity, Body, Character, Inventory, MessageKind, Prompt, Stat};
use crate::state::{
    BodyPart, CharacterId, EffectData, EffectId, HitPoints, Item, ItemId, ItemTypeId, Position,
    QualityId, RecipeId, SkillId, VitaminId,
};

/// Character backed by plain collections with scripted prompt answers.
///
/// Unanswered prompts decline: `query_yn` returns false and every chooser
/// returns `None`.
#[derive(Clone, Debug)]
pub struct SandboxCharacter {
    pub id: CharacterId,
    pub name: String,
    pub npc: bool,
    pub position: Position,
    pub moves: i32,
    pub underwater: bool,
    pub skills: BTreeMap<SkillId, i32>,
    /// Experience granted through `practice`, per skill.
    pub experience: BTreeMap<SkillId, i32>,
    pub stats: BTreeMap<Stat, i32>,
    pub traits: BTreeSet<String>,
    pub hp: BTreeMap<BodyPart, HitPoints>,
    pub effects: Vec<EffectData>,
    pub pain: i32,
    pub morale: i32,
    pub vitamins: BTreeMap<VitaminId, i32>,
    pub items: BTreeMap<ItemId, Item>,
    pub worn: BTreeSet<ItemId>,
    pub wielded: Option<ItemId>,
    /// Charges available from sources that are not items (fire, UPS).
    pub pseudo_charges: BTreeMap<ItemTypeId, i64>,
    pub qualities: BTreeMap<QualityId, i32>,
    pub known_recipes: BTreeSet<RecipeId>,
    pub activity: Option<Activity>,
    pub messages: Vec<(MessageKind, String)>,
    pub questions: Vec<String>,
    next_item: u32,
    yes_no: VecDeque<bool>,
    directions: VecDeque<Position>,
    item_choices: VecDeque<ItemId>,
    options: VecDeque<usize>,
    body_parts: VecDeque<BodyPart>,
    texts: VecDeque<String>,
}

impl SandboxCharacter {
    pub const DEFAULT_HP: i32 = 60;
    pub const DEFAULT_STAT: i32 = 8;

    pub fn player() -> Self {
        Self::new(CharacterId::PLAYER, "You", false)
    }

    pub fn npc(id: u32, name: &str) -> Self {
        Self::new(CharacterId(id), name, true)
    }

    pub fn new(id: CharacterId, name: &str, npc: bool) -> Self {
        let stats = [
            (Stat::Strength, Self::DEFAULT_STAT),
            (Stat::Dexterity, Self::DEFAULT_STAT),
            (Stat::Intelligence, Self::DEFAULT_STAT),
            (Stat::Perception, Self::DEFAULT_STAT),
            (Stat::Speed, 100),
        ];
        Self {
            id,
            name: name.to_owned(),
            npc,
            position: Position::ORIGIN,
            moves: 100,
            underwater: false,
            skills: BTreeMap::new(),
            experience: BTreeMap::new(),
            stats: stats.into_iter().collect(),
            traits: BTreeSet::new(),
            hp: BodyPart::ALL
                .into_iter()
                .map(|bp| (bp, HitPoints::full(Self::DEFAULT_HP)))
                .collect(),
            effects: Vec::new(),
            pain: 0,
            morale: 0,
            vitamins: BTreeMap::new(),
            items: BTreeMap::new(),
            worn: BTreeSet::new(),
            wielded: None,
            pseudo_charges: BTreeMap::new(),
            qualities: BTreeMap::new(),
            known_recipes: BTreeSet::new(),
            activity: None,
            messages: Vec::new(),
            questions: Vec::new(),
            next_item: 1,
            yes_no: VecDeque::new(),
            directions: VecDeque::new(),
            item_choices: VecDeque::new(),
            options: VecDeque::new(),
            body_parts: VecDeque::new(),
            texts: VecDeque::new(),
        }
    }

    // ===== builders =====

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_skill(mut self, skill: &str, level: i32) -> Self {
        self.skills.insert(SkillId::new(skill), level);
        self
    }

    pub fn with_stat(mut self, stat: Stat, value: i32) -> Self {
        self.stats.insert(stat, value);
        self
    }

    pub fn with_trait(mut self, name: &str) -> Self {
        self.traits.insert(name.to_owned());
        self
    }

    pub fn with_quality(mut self, quality: &str, level: i32) -> Self {
        self.qualities.insert(QualityId::new(quality), level);
        self
    }

    pub fn with_pseudo_charges(mut self, id: &str, charges: i64) -> Self {
        self.pseudo_charges.insert(ItemTypeId::new(id), charges);
        self
    }

    pub fn with_hp(mut self, bp: BodyPart, current: i32) -> Self {
        self.hp.insert(bp, HitPoints::new(current, Self::DEFAULT_HP));
        self
    }

    pub fn knowing(mut self, recipe: &str) -> Self {
        self.known_recipes.insert(RecipeId::new(recipe));
        self
    }

    // ===== scripting =====

    pub fn script_yn(&mut self, answer: bool) -> &mut Self {
        self.yes_no.push_back(answer);
        self
    }

    pub fn script_direction(&mut self, pos: Position) -> &mut Self {
        self.directions.push_back(pos);
        self
    }

    pub fn script_item(&mut self, id: ItemId) -> &mut Self {
        self.item_choices.push_back(id);
        self
    }

    pub fn script_option(&mut self, index: usize) -> &mut Self {
        self.options.push_back(index);
        self
    }

    pub fn script_body_part(&mut self, bp: BodyPart) -> &mut Self {
        self.body_parts.push_back(bp);
        self
    }

    pub fn script_text(&mut self, text: &str) -> &mut Self {
        self.texts.push_back(text.to_owned());
        self
    }

    // ===== inspection =====

    pub fn said(&self, fragment: &str) -> bool {
        self.messages.iter().any(|(_, text)| text.contains(fragment))
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(|(_, text)| text.as_str())
    }

    pub fn experience_in(&self, skill: &str) -> i32 {
        self.experience
            .get(&SkillId::new(skill))
            .copied()
            .unwrap_or(0)
    }

    fn items_of<'s>(&'s self, id: &'s ItemTypeId) -> impl Iterator<Item = ItemId> + 's {
        self.items
            .iter()
            .filter(move |(_, item)| &item.type_id == id)
            .map(|(item_id, _)| *item_id)
    }
}

impl Character for SandboxCharacter {
    fn id(&self) -> CharacterId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_npc(&self) -> bool {
        self.npc
    }

    fn position(&self) -> Position {
        self.position
    }

    fn moves(&self) -> i32 {
        self.moves
    }

    fn set_moves(&mut self, moves: i32) {
        self.moves = moves;
    }

    fn is_underwater(&self) -> bool {
        self.underwater
    }

    fn skill_level(&self, skill: &SkillId) -> i32 {
        self.skills.get(skill).copied().unwrap_or(0)
    }

    fn practice(&mut self, skill: &SkillId, amount: i32, cap: i32) {
        if amount <= 0 || self.skill_level(skill) >= cap {
            return;
        }
        *self.experience.entry(skill.clone()).or_default() += amount;
    }

    fn stat(&self, stat: Stat) -> i32 {
        self.stats.get(&stat).copied().unwrap_or(0)
    }

    fn mod_stat(&mut self, stat: Stat, delta: i32) {
        *self.stats.entry(stat).or_default() += delta;
    }

    fn has_trait(&self, name: &str) -> bool {
        self.traits.contains(name)
    }

    fn assign_activity(&mut self, activity: Activity) {
        self.activity = Some(activity);
    }

    fn take_activity(&mut self) -> Option<Activity> {
        self.activity.take()
    }
}

impl Body for SandboxCharacter {
    fn hp(&self, bp: BodyPart) -> HitPoints {
        self.hp.get(&bp).copied().unwrap_or(HitPoints::full(0))
    }

    fn heal(&mut self, bp: BodyPart, amount: i32) -> i32 {
        self.hp.get_mut(&bp).map_or(0, |hp| hp.heal(amount))
    }

    fn apply_damage(&mut self, bp: BodyPart, amount: i32) -> i32 {
        self.hp.get_mut(&bp).map_or(0, |hp| hp.damage(amount))
    }

    fn has_effect(&self, id: &EffectId, bp: Option<BodyPart>) -> bool {
        self.effects.iter().any(|e| &e.id == id && e.bp == bp)
    }

    fn has_effect_anywhere(&self, id: &EffectId) -> bool {
        self.effects.iter().any(|e| &e.id == id)
    }

    fn effect_duration(&self, id: &EffectId, bp: Option<BodyPart>) -> u32 {
        self.effects
            .iter()
            .find(|e| &e.id == id && e.bp == bp)
            .map_or(0, |e| e.duration)
    }

    fn add_effect(&mut self, effect: &EffectData) {
        match self
            .effects
            .iter_mut()
            .find(|e| e.id == effect.id && e.bp == effect.bp)
        {
            Some(existing) => {
                existing.duration = existing.duration.max(effect.duration);
                existing.permanent |= effect.permanent;
            }
            None => self.effects.push(effect.clone()),
        }
    }

    fn remove_effect(&mut self, id: &EffectId, bp: Option<BodyPart>) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| !(&e.id == id && e.bp == bp));
        self.effects.len() != before
    }

    fn mod_pain(&mut self, amount: i32) {
        self.pain = (self.pain + amount).max(0);
    }

    fn morale_level(&self) -> i32 {
        self.morale
    }

    fn add_morale(&mut self, _kind: &str, bonus: i32, max_bonus: i32, _duration: u32) {
        let raised = self.morale + bonus;
        self.morale = if bonus > 0 {
            raised.min(max_bonus.max(self.morale))
        } else {
            raised
        };
    }

    fn vitamin_mod(&mut self, vitamin: &VitaminId, amount: i32) {
        *self.vitamins.entry(vitamin.clone()).or_default() += amount;
    }
}

impl Inventory for SandboxCharacter {
    fn item_ids(&self) -> Vec<ItemId> {
        self.items.keys().copied().collect()
    }

    fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    fn take_item(&mut self, id: ItemId) -> Option<Item> {
        self.worn.remove(&id);
        if self.wielded == Some(id) {
            self.wielded = None;
        }
        self.items.remove(&id)
    }

    fn detach_item(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    fn reattach_item(&mut self, id: ItemId, item: Item) {
        self.items.insert(id, item);
    }

    fn add_item(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item += 1;
        self.items.insert(id, item);
        id
    }

    fn is_worn(&self, id: ItemId) -> bool {
        self.worn.contains(&id)
    }

    fn wielded(&self) -> Option<ItemId> {
        self.wielded
    }

    fn wield(&mut self, id: ItemId) -> bool {
        if !self.items.contains_key(&id) {
            return false;
        }
        self.wielded = Some(id);
        true
    }

    fn amount_of(&self, id: &ItemTypeId) -> i64 {
        self.items_of(id).count() as i64
    }

    fn charges_of(&self, id: &ItemTypeId) -> i64 {
        let pseudo = self.pseudo_charges.get(id).copied().unwrap_or(0);
        let carried: i64 = self
            .items
            .values()
            .filter(|item| &item.type_id == id)
            .map(|item| item.charges.max(0))
            .sum();
        pseudo + carried
    }

    fn use_amount(&mut self, id: &ItemTypeId, quantity: i64) -> i64 {
        let victims: Vec<ItemId> = self.items_of(id).take(quantity.max(0) as usize).collect();
        for victim in &victims {
            self.take_item(*victim);
        }
        victims.len() as i64
    }

    fn use_charges(&mut self, id: &ItemTypeId, quantity: i64) -> i64 {
        let mut left = quantity.max(0);
        if let Some(pseudo) = self.pseudo_charges.get_mut(id) {
            let taken = left.min(*pseudo);
            *pseudo -= taken;
            left -= taken;
        }
        for item in self.items.values_mut().filter(|item| &item.type_id == id) {
            if left == 0 {
                break;
            }
            let taken = left.min(item.charges.max(0));
            item.charges -= taken;
            left -= taken;
        }
        quantity.max(0) - left
    }

    fn max_quality(&self, quality: &QualityId) -> i32 {
        self.qualities.get(quality).copied().unwrap_or(0)
    }

    fn knows_recipe(&self, recipe: &RecipeId) -> bool {
        self.known_recipes.contains(recipe)
    }
}

impl Prompt for SandboxCharacter {
    fn add_msg(&mut self, kind: MessageKind, text: &str) {
        self.messages.push((kind, text.to_owned()));
    }

    fn query_yn(&mut self, question: &str) -> bool {
        self.questions.push(question.to_owned());
        self.yes_no.pop_front().unwrap_or(false)
    }

    fn choose_direction(&mut self, prompt: &str) -> Option<Position> {
        self.questions.push(prompt.to_owned());
        self.directions.pop_front()
    }

    fn choose_item(&mut self, prompt: &str, candidates: &[ItemId]) -> Option<ItemId> {
        self.questions.push(prompt.to_owned());
        self.item_choices
            .pop_front()
            .filter(|choice| candidates.contains(choice))
    }

    fn choose_option(&mut self, prompt: &str, options: &[String]) -> Option<usize> {
        self.questions.push(prompt.to_owned());
        self.options.pop_front().filter(|index| *index < options.len())
    }

    fn choose_body_part(&mut self, prompt: &str) -> Option<BodyPart> {
        self.questions.push(prompt.to_owned());
        self.body_parts.pop_front()
    }

    fn input_text(&mut self, prompt: &str, _initial: &str) -> Option<String> {
        self.questions.push(prompt.to_owned());
        self.texts.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_charges_are_spent_first() {
        let mut you = SandboxCharacter::player().with_pseudo_charges("fire", 3);
        you.add_item(Item::new("fire", crate::state::Tick::ZERO).with_charges(5));
        let fire = ItemTypeId::new("fire");
        assert_eq!(you.charges_of(&fire), 8);
        assert_eq!(you.use_charges(&fire, 4), 4);
        assert_eq!(you.pseudo_charges[&fire], 0);
        assert_eq!(you.charges_of(&fire), 4);
    }

    #[test]
    fn practice_stops_at_cap() {
        let mut you = SandboxCharacter::player().with_skill("tailor", 3);
        let tailor = SkillId::new("tailor");
        you.practice(&tailor, 5, 3);
        assert_eq!(you.experience_in("tailor"), 0);
        you.practice(&tailor, 5, 4);
        assert_eq!(you.experience_in("tailor"), 5);
    }

    #[test]
    fn detached_items_keep_their_slot() {
        let mut you = SandboxCharacter::player();
        let rag = ItemTypeId::new("rag");
        let id = you.add_item(Item::new("rag", crate::state::Tick::ZERO));
        assert!(you.wield(id));

        let item = you.detach_item(id).unwrap();
        assert_eq!(you.amount_of(&rag), 0);
        assert_eq!(you.use_amount(&rag, 1), 0);
        assert_eq!(you.wielded(), Some(id));

        you.reattach_item(id, item);
        assert_eq!(you.amount_of(&rag), 1);
        assert!(you.item(id).is_some());

        you.detach_item(id);
        assert!(you.take_item(id).is_none());
        assert_eq!(you.wielded(), None);
    }

    #[test]
    fn unscripted_prompts_decline() {
        let mut you = SandboxCharacter::player();
        assert!(!you.query_yn("Really?"));
        assert_eq!(you.choose_direction("Where?"), None);
        assert_eq!(you.questions.len(), 2);
    }
}
