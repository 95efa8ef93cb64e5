mod common;

use item_use_core::sandbox::{SandboxCharacter, SandboxWorld};
use item_use_core::{
    ConfigRecord, GameError, Inventory, Item, ItemId, ItemTypeId, Position, Tick, UseError,
};
use item_use_runtime::{ActivationRequest, ActivationService, RuntimeError};

fn whistle() -> ConfigRecord {
    ConfigRecord::new("manualnoise")
        .with("use_message", "You blow your whistle.")
        .with("noise_message", "a loud whistle.")
        .with("noise", 24)
        .with("moves", 100)
}

fn caffeine() -> ConfigRecord {
    ConfigRecord::new("consume_drug")
        .with("activation_message", "You pop a caffeine pill.")
        .with("moves", 50)
}

fn grenade() -> ConfigRecord {
    ConfigRecord::new("transform")
        .with("target", "grenade_act")
        .with("msg", "You pull the pin on the grenade.")
        .with("active", true)
        .with("menu_text", "Pull pin")
}

fn first_aid() -> ConfigRecord {
    ConfigRecord::new("heal")
        .with("move_cost", 100)
        .with("limb_power", 10.0)
}

#[test]
fn carried_item_runs_its_action() {
    let mut service = service_with(&[("whistle", whistle())]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("whistle", Tick(0)));

    let done = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap();

    assert_eq!(done.tag, "manualnoise");
    assert_eq!(done.charges, 0);
    assert!(!done.used_up);
    assert!(!done.scheduled);
    assert!(you.said("You blow your whistle."));
    assert_eq!(you.moves, 0);
    assert_eq!(world.sounds().count(), 1);
    assert!(you.item(id).is_some());
}

#[test]
fn ground_item_stays_on_the_ground() {
    let mut service = service_with(&[("whistle", whistle())]);
    let mut you = SandboxCharacter::player();
    let mut world =
        SandboxWorld::new().with_ground_item(Position::ORIGIN, Item::new("whistle", Tick(0)));

    service
        .activate(
            &mut you,
            &mut world,
            &ActivationRequest::on_ground(Position::ORIGIN, 0),
        )
        .unwrap();

    assert_eq!(world.ground.get(&Position::ORIGIN).map_or(0, Vec::len), 1);
    assert!(you.said("You blow your whistle."));
}

#[test]
fn stacked_item_is_removed_when_the_last_charge_goes() {
    let mut service = service_with(&[("caffeine", caffeine())]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("caffeine", Tick(0)).with_charges(2));
    let request = ActivationRequest::carried(id);

    let first = service.activate(&mut you, &mut world, &request).unwrap();
    assert_eq!(first.charges, 1);
    assert!(!first.used_up);
    assert_eq!(you.item(id).map(|pill| pill.charges), Some(1));

    let second = service.activate(&mut you, &mut world, &request).unwrap();
    assert!(second.used_up);
    assert!(you.item(id).is_none());

    let err = service.activate(&mut you, &mut world, &request).unwrap_err();
    assert!(matches!(err, RuntimeError::ItemNotFound(missing) if missing == id));
}

#[test]
fn transformed_item_is_written_back() {
    let mut service = service_with(&[("grenade", grenade())]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("grenade", Tick(0)));

    let actions = service.actions(&ItemTypeId::new("grenade"));
    assert_eq!(actions, vec![("transform", "Pull pin".to_owned())]);

    service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap();

    let armed = you.item(id).unwrap();
    assert_eq!(armed.type_id, ItemTypeId::new("grenade_act"));
    assert!(armed.active);
    assert!(you.said("You pull the pin on the grenade."));
}

#[test]
fn action_can_be_picked_by_tag() {
    let mut service = service_with(&[("whistle", caffeine()), ("whistle", whistle())]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("whistle", Tick(0)));

    let done = service
        .activate(
            &mut you,
            &mut world,
            &ActivationRequest::carried(id).with_action("manualnoise"),
        )
        .unwrap();
    assert_eq!(done.tag, "manualnoise");

    let err = service
        .activate(
            &mut you,
            &mut world,
            &ActivationRequest::carried(id).with_action("heal"),
        )
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownAction { .. }));
}

#[test]
fn items_without_actions_are_rejected() {
    let mut service = service_with(&[]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("rag", Tick(0)));

    let err = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NoActors(_)));
    assert_eq!(err.error_code(), "RUNTIME_NO_ACTORS");

    let err = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(ItemId(99)))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::ItemNotFound(_)));
}

#[test]
fn failed_gate_leaves_everything_alone() {
    let mut service = service_with(&[("1st_aid", first_aid())]);
    let mut you = SandboxCharacter::player();
    you.underwater = true;
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("1st_aid", Tick(0)).with_charges(5));

    let usable = service
        .usable_actions(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap();
    assert!(usable.is_empty());

    let err = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Unavailable { .. }));
    assert!(err.severity().is_recoverable());
    assert_eq!(you.item(id).map(|kit| kit.charges), Some(5));
    assert_eq!(you.moves, 100);
}

#[test]
fn refused_use_consumes_nothing() {
    let mut service = service_with(&[("1st_aid", first_aid())]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("1st_aid", Tick(0)).with_charges(5));

    // No body part scripted: the prompt is cancelled.
    let err = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap_err();
    assert_eq!(err.use_error(), Some(&UseError::Cancelled));
    assert_eq!(you.item(id).map(|kit| kit.charges), Some(5));
}

#[test]
fn empty_item_is_refused_before_dispatch() {
    let mut service = service_with(&[("1st_aid", first_aid())]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let id = you.add_item(Item::new("1st_aid", Tick(0)).with_charges(0));

    let err = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Unavailable { .. }));
}

#[test]
fn active_item_is_not_counted_as_its_own_requirement() {
    let booster = caffeine().with("charges_needed", ConfigRecord::default().with("caffeine", 1));
    let mut service = service_with(&[("caffeine", booster)]);
    let mut you = SandboxCharacter::player();
    let mut world = SandboxWorld::new();
    let lone = you.add_item(Item::new("caffeine", Tick(0)).with_charges(20));

    let err = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(lone))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Unavailable { .. }));
    assert_eq!(you.item(lone).map(|pill| pill.charges), Some(20));

    let spare = you.add_item(Item::new("caffeine", Tick(0)).with_charges(20));
    let usable = service
        .usable_actions(&mut you, &mut world, &ActivationRequest::carried(lone))
        .unwrap();
    assert_eq!(usable, vec!["consume_drug"]);
    assert_eq!(you.item(lone).map(|pill| pill.charges), Some(20));

    service
        .activate(&mut you, &mut world, &ActivationRequest::carried(lone))
        .unwrap();
    assert_eq!(you.item(lone).map(|pill| pill.charges), Some(19));
    assert_eq!(you.item(spare).map(|pill| pill.charges), Some(19));
    assert_eq!(you.charges_of(&ItemTypeId::new("caffeine")), 38);
}

fn service_with(records: &[(&str, ConfigRecord)]) -> ActivationService {
    common::service(records, &[])
}
