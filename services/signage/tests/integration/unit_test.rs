use counterate_domain::change::ChangeKind;
use counterate_domain::identity::{Role, Status};

use counterate_signage::domain::types::{Identity, UnitDefaults};
use counterate_signage::error::SignageServiceError;
use counterate_signage::usecase::activity::{self, RecordActivityUseCase};
use counterate_signage::usecase::rates::{SaveRateInput, SaveRateUseCase};
use counterate_signage::usecase::session::CheckSessionUseCase;
use counterate_signage::usecase::unit::{
    CreateUnitInput, CreateUnitUseCase, DeleteUnitUseCase, GetUnitDisplayUseCase,
    ListUnitsUseCase, ResetCredentialUseCase, SetStatusUseCase, UpdateUnitInput,
    UpdateUnitUseCase,
};

use crate::helpers::{MemoryStore, RecordingNotifier, identity};

fn root() -> Identity {
    identity("root", Role::SuperAdmin)
}

fn create_input(username: &str) -> CreateUnitInput {
    CreateUnitInput {
        username: username.to_owned(),
        display_username: None,
        admin_credential_hash: Some("admin-hash".to_owned()),
        display_credential_hash: None,
        marquee_text: Some("Branch news".to_owned()),
    }
}

async fn create(store: &MemoryStore, username: &str) -> (Identity, Identity) {
    let unit = CreateUnitUseCase {
        repo: store.clone(),
        defaults: UnitDefaults::default(),
    }
    .execute(&root(), create_input(username))
    .await
    .unwrap();
    (unit.admin, unit.display.unwrap())
}

#[tokio::test]
async fn should_create_paired_unit_with_config() {
    let store = MemoryStore::default();

    let (admin, display) = create(&store, "downtown").await;

    assert_eq!(admin.paired_user_id, Some(display.id));
    assert_eq!(display.username, "display_downtown");
    assert_eq!(display.role, Role::Display);
    assert_eq!(admin.created_by.as_deref(), Some("root"));
    assert_eq!(store.config(admin.id).unwrap().marquee_text, "Branch news");
}

#[tokio::test]
async fn should_reject_duplicate_username() {
    let store = MemoryStore::default();
    create(&store, "downtown").await;

    let result = CreateUnitUseCase {
        repo: store.clone(),
        defaults: UnitDefaults::default(),
    }
    .execute(&root(), create_input("downtown"))
    .await;

    assert!(matches!(result, Err(SignageServiceError::UsernameTaken)));
    assert_eq!(store.identities().len(), 2);
}

#[tokio::test]
async fn should_reject_invalid_username() {
    let store = MemoryStore::default();

    let result = CreateUnitUseCase {
        repo: store.clone(),
        defaults: UnitDefaults::default(),
    }
    .execute(&root(), create_input("has space"))
    .await;

    assert!(matches!(result, Err(SignageServiceError::InvalidUsername)));
}

#[tokio::test]
async fn should_list_units_with_displays() {
    let store = MemoryStore::default();
    create(&store, "west").await;
    create(&store, "east").await;

    let units = ListUnitsUseCase {
        repo: store.clone(),
    }
    .execute()
    .await
    .unwrap();

    let names: Vec<&str> = units.iter().map(|u| u.admin.username.as_str()).collect();
    assert_eq!(names, vec!["east", "west"]);
    assert!(units.iter().all(|u| u.display.is_some()));
}

#[tokio::test]
async fn should_update_names_and_marquee() {
    let store = MemoryStore::default();
    let notifier = RecordingNotifier::default();
    let (admin, display) = create(&store, "downtown").await;

    UpdateUnitUseCase {
        identities: store.clone(),
        configs: store.clone(),
        notifier: notifier.clone(),
        marquee_text: "Welcome".to_owned(),
    }
    .execute(
        admin.id,
        UpdateUnitInput {
            username: Some("uptown".to_owned()),
            display_username: Some("uptown_screen".to_owned()),
            marquee_text: Some("New hours".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(store.identity(admin.id).unwrap().username, "uptown");
    assert_eq!(store.identity(display.id).unwrap().username, "uptown_screen");
    assert_eq!(store.config(admin.id).unwrap().marquee_text, "New hours");
    assert_eq!(notifier.published(), vec![ChangeKind::Branding]);
}

fn update_uc(store: &MemoryStore) -> UpdateUnitUseCase<MemoryStore, MemoryStore, RecordingNotifier> {
    UpdateUnitUseCase {
        identities: store.clone(),
        configs: store.clone(),
        notifier: RecordingNotifier::default(),
        marquee_text: "Welcome".to_owned(),
    }
}

#[tokio::test]
async fn should_leave_unit_untouched_when_display_rename_clashes() {
    let store = MemoryStore::default();
    let (admin, display) = create(&store, "downtown").await;
    create(&store, "uptown").await;

    let result = update_uc(&store)
        .execute(
            admin.id,
            UpdateUnitInput {
                username: Some("midtown".to_owned()),
                display_username: Some("display_uptown".to_owned()),
                admin_credential_hash: Some("new-hash".to_owned()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(SignageServiceError::UsernameTaken)));
    let admin_after = store.identity(admin.id).unwrap();
    assert_eq!(admin_after.username, "downtown");
    assert_eq!(admin_after.credential_hash, admin.credential_hash);
    assert_eq!(admin_after.session_version, admin.session_version);
    assert_eq!(store.identity(display.id).unwrap().username, "display_downtown");
}

#[tokio::test]
async fn should_reject_same_name_for_both_sides() {
    let store = MemoryStore::default();
    let (admin, _) = create(&store, "downtown").await;

    let result = update_uc(&store)
        .execute(
            admin.id,
            UpdateUnitInput {
                username: Some("midtown".to_owned()),
                display_username: Some("midtown".to_owned()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(SignageServiceError::UsernameTaken)));
    assert_eq!(store.identity(admin.id).unwrap().username, "downtown");
}

#[tokio::test]
async fn should_ignore_display_fields_for_unpaired_admin() {
    let store = MemoryStore::default();
    let solo = identity("solo", Role::Admin);
    store.insert_identity(solo.clone());

    update_uc(&store)
        .execute(
            solo.id,
            UpdateUnitInput {
                username: Some("solo-2".to_owned()),
                display_username: Some("display_solo".to_owned()),
                display_credential_hash: Some("display-hash".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(store.identity(solo.id).unwrap().username, "solo-2");
    assert_eq!(store.identities().len(), 1);
}

#[tokio::test]
async fn should_apply_status_to_both_sides() {
    let store = MemoryStore::default();
    let (admin, display) = create(&store, "downtown").await;

    SetStatusUseCase {
        repo: store.clone(),
    }
    .execute(display.id, Status::Suspended)
    .await
    .unwrap();

    assert_eq!(store.identity(admin.id).unwrap().status, Status::Suspended);
    assert_eq!(store.identity(display.id).unwrap().status, Status::Suspended);

    let session = CheckSessionUseCase {
        repo: store.clone(),
    }
    .execute(display.id, display.session_version)
    .await;
    assert!(matches!(session, Err(SignageServiceError::Unauthorized)));
}

#[tokio::test]
async fn should_refuse_status_change_for_superadmin() {
    let store = MemoryStore::default();
    let root = root();
    store.insert_identity(root.clone());

    let result = SetStatusUseCase {
        repo: store.clone(),
    }
    .execute(root.id, Status::Inactive)
    .await;

    assert!(matches!(result, Err(SignageServiceError::Forbidden)));
}

#[tokio::test]
async fn should_invalidate_sessions_on_credential_reset() {
    let store = MemoryStore::default();
    let defaults = UnitDefaults::default();
    let (admin, display) = create(&store, "downtown").await;

    ResetCredentialUseCase {
        repo: store.clone(),
        defaults: defaults.clone(),
    }
    .execute(admin.id, None)
    .await
    .unwrap();

    let admin_now = store.identity(admin.id).unwrap();
    let display_now = store.identity(display.id).unwrap();
    assert_eq!(admin_now.credential_hash, defaults.admin_credential_hash);
    assert_eq!(display_now.credential_hash, defaults.display_credential_hash);
    assert_eq!(admin_now.session_version, admin.session_version + 1);

    let check = CheckSessionUseCase {
        repo: store.clone(),
    };
    assert!(matches!(
        check.execute(display.id, display.session_version).await,
        Err(SignageServiceError::Unauthorized)
    ));
    assert!(check.execute(display.id, display_now.session_version).await.is_ok());
}

#[tokio::test]
async fn should_delete_unit_with_scoped_rows() {
    let store = MemoryStore::default();
    let (admin, display) = create(&store, "downtown").await;
    SaveRateUseCase {
        repo: store.clone(),
        notifier: RecordingNotifier::default(),
    }
    .execute(
        admin.id,
        SaveRateInput {
            id: None,
            currency: "USD".to_owned(),
            tt_buy: 1.0,
            tt_sell: 1.1,
            bank_buy: 0.9,
            bank_sell: 1.2,
            order: 1,
            active: true,
        },
    )
    .await
    .unwrap();

    DeleteUnitUseCase {
        repo: store.clone(),
    }
    .execute(admin.id)
    .await
    .unwrap();

    assert!(store.identity(admin.id).is_none());
    assert!(store.identity(display.id).is_none());
    assert!(store.config(admin.id).is_none());
    assert_eq!(store.rate_count(), 0);
}

#[tokio::test]
async fn should_return_unit_not_found_for_display_id() {
    let store = MemoryStore::default();
    let (_, display) = create(&store, "downtown").await;

    let result = GetUnitDisplayUseCase {
        repo: store.clone(),
    }
    .execute(display.id)
    .await;

    assert!(matches!(result, Err(SignageServiceError::UnitNotFound)));
}

#[tokio::test]
async fn should_record_activity_entry() {
    let store = MemoryStore::default();
    let actor = root();

    RecordActivityUseCase {
        repo: store.clone(),
    }
    .execute(
        actor.id,
        activity::CREATE_UNIT,
        "Created unit downtown".to_owned(),
        Some("203.0.113.9".to_owned()),
    )
    .await;

    let entries = store.activity();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, activity::CREATE_UNIT);
    assert_eq!(entries[0].ip_address.as_deref(), Some("203.0.113.9"));
}
