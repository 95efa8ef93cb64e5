mod common;

use item_use_core::sandbox::{SandboxCharacter, SandboxWorld};
use item_use_core::{Body, BodyPart, CharacterId, ConfigRecord, Inventory, Item, ItemId, Tick};
use item_use_runtime::{ActivationRequest, ActivationService, RuntimeError, TickOutcome};

fn first_aid_kit() -> ConfigRecord {
    ConfigRecord::new("heal")
        .with("move_cost", 250)
        .with("limb_power", 10.0)
        .with("long_action", true)
}

fn setup() -> (ActivationService, SandboxCharacter, SandboxWorld, ItemId) {
    let service = common::service(&[("1st_aid", first_aid_kit())], &[]);
    let mut you = SandboxCharacter::player().with_hp(BodyPart::ArmL, 30);
    you.script_body_part(BodyPart::ArmL);
    let id = you.add_item(Item::new("1st_aid", Tick(0)).with_charges(5));
    (service, you, SandboxWorld::new(), id)
}

#[test]
fn long_treatment_finishes_after_enough_ticks() {
    let (mut service, mut you, mut world, id) = setup();

    let started = service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap();
    assert!(started.scheduled);
    assert_eq!(started.charges, 0);
    assert!(you.activity.is_none());
    assert_eq!(you.hp(BodyPart::ArmL).current, 30);
    assert_eq!(service.scheduler().len(), 1);

    assert_eq!(
        service.advance_long_action(&mut you, &mut world).unwrap(),
        TickOutcome::InProgress { remaining: 150 }
    );
    assert_eq!(
        service.advance_long_action(&mut you, &mut world).unwrap(),
        TickOutcome::InProgress { remaining: 50 }
    );
    assert_eq!(you.hp(BodyPart::ArmL).current, 30);

    let TickOutcome::Finished(done) = service.advance_long_action(&mut you, &mut world).unwrap()
    else {
        panic!("treatment should finish on the third tick");
    };
    assert_eq!(done.charges, 1);
    assert!(!done.used_up);
    assert_eq!(done.task.body_part, BodyPart::ArmL);
    assert_eq!(you.hp(BodyPart::ArmL).current, 40);
    assert_eq!(you.item(id).map(|kit| kit.charges), Some(4));
    assert_eq!(you.moves, 100 - 250);
    assert!(you.experience_in("firstaid") > 0);
    assert!(service.scheduler().is_empty());

    assert_eq!(
        service.advance_long_action(&mut you, &mut world).unwrap(),
        TickOutcome::Idle
    );
}

#[test]
fn cancelled_treatment_changes_nothing() {
    let (mut service, mut you, mut world, id) = setup();
    service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap();
    service.advance_long_action(&mut you, &mut world).unwrap();

    let task = service.cancel_long_action(CharacterId::PLAYER).unwrap();
    assert_eq!(task.moves, 150);
    assert_eq!(task.item, id);
    assert_eq!(you.hp(BodyPart::ArmL).current, 30);
    assert_eq!(you.item(id).map(|kit| kit.charges), Some(5));
    assert_eq!(
        service.advance_long_action(&mut you, &mut world).unwrap(),
        TickOutcome::Idle
    );

    let err = service.cancel_long_action(CharacterId::PLAYER).unwrap_err();
    assert!(matches!(err, RuntimeError::NoPendingAction(_)));
}

#[test]
fn treatment_aborts_when_the_kit_is_gone() {
    let (mut service, mut you, mut world, id) = setup();
    service
        .activate(&mut you, &mut world, &ActivationRequest::carried(id))
        .unwrap();
    you.take_item(id);

    service.advance_long_action(&mut you, &mut world).unwrap();
    service.advance_long_action(&mut you, &mut world).unwrap();
    let outcome = service.advance_long_action(&mut you, &mut world).unwrap();
    assert!(matches!(outcome, TickOutcome::Aborted { .. }));
    assert_eq!(you.hp(BodyPart::ArmL).current, 30);
}
