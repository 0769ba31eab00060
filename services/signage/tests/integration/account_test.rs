use counterate_domain::identity::Role;

use counterate_signage::domain::types::{Identity, LOCKED_CREDENTIAL, UnitDefaults};
use counterate_signage::error::SignageServiceError;
use counterate_signage::usecase::account::{
    CreateSuperAdminUseCase, ProfileInput, UpdateProfileUseCase,
};
use counterate_signage::usecase::activity::{
    self, ListActivityUseCase, RECENT_ACTIVITY_LIMIT, RecordActivityUseCase,
};

use crate::helpers::{MemoryStore, identity, seed_unit};

fn seeded_root(store: &MemoryStore) -> Identity {
    let root = identity("root", Role::SuperAdmin);
    store.insert_identity(root.clone());
    root
}

fn create_uc(store: &MemoryStore) -> CreateSuperAdminUseCase<MemoryStore> {
    CreateSuperAdminUseCase {
        repo: store.clone(),
        defaults: UnitDefaults::default(),
    }
}

// ── CreateSuperAdmin ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_super_admin_with_default_credential() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);

    let created = create_uc(&store).execute(&root, " ops ", None).await.unwrap();

    let stored = store.identity(created.id).unwrap();
    assert_eq!(stored.username, "ops");
    assert_eq!(stored.role, Role::SuperAdmin);
    assert_eq!(stored.credential_hash, LOCKED_CREDENTIAL);
    assert_eq!(stored.created_by.as_deref(), Some("root"));
    assert!(stored.paired_user_id.is_none());
}

#[tokio::test]
async fn should_reject_taken_super_admin_username() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);
    seed_unit(&store, "downtown", "display_downtown");

    let result = create_uc(&store)
        .execute(&root, "downtown", Some("hash".into()))
        .await;

    assert!(matches!(result, Err(SignageServiceError::UsernameTaken)));
    assert_eq!(store.identities().len(), 3);
}

#[tokio::test]
async fn should_reject_invalid_super_admin_username() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);

    let result = create_uc(&store).execute(&root, "two words", None).await;

    assert!(matches!(result, Err(SignageServiceError::InvalidUsername)));
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_rename_own_profile() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);
    let uc = UpdateProfileUseCase {
        repo: store.clone(),
    };

    let changed = uc
        .execute(
            &root,
            ProfileInput {
                username: Some("chief".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(changed);
    let stored = store.identity(root.id).unwrap();
    assert_eq!(stored.username, "chief");
    assert_eq!(stored.session_version, root.session_version);
}

#[tokio::test]
async fn should_end_session_when_credential_changes() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);
    let uc = UpdateProfileUseCase {
        repo: store.clone(),
    };

    uc.execute(
        &root,
        ProfileInput {
            credential_hash: Some("new-hash".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let stored = store.identity(root.id).unwrap();
    assert_eq!(stored.credential_hash, "new-hash");
    assert_eq!(stored.session_version, root.session_version + 1);
}

#[tokio::test]
async fn should_report_no_change_for_same_username() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);
    let uc = UpdateProfileUseCase {
        repo: store.clone(),
    };

    let changed = uc
        .execute(
            &root,
            ProfileInput {
                username: Some("root".into()),
                credential_hash: Some(String::new()),
            },
        )
        .await
        .unwrap();

    assert!(!changed);
}

#[tokio::test]
async fn should_refuse_profile_rename_onto_existing_username() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);
    seed_unit(&store, "downtown", "display_downtown");
    let uc = UpdateProfileUseCase {
        repo: store.clone(),
    };

    let result = uc
        .execute(
            &root,
            ProfileInput {
                username: Some("downtown".into()),
                credential_hash: Some("new-hash".into()),
            },
        )
        .await;

    assert!(matches!(result, Err(SignageServiceError::UsernameTaken)));
    let stored = store.identity(root.id).unwrap();
    assert_eq!(stored.username, "root");
    assert_eq!(stored.session_version, root.session_version);
}

// ── ListActivity ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_activity_newest_first_with_actor() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);
    let (admin, _) = seed_unit(&store, "downtown", "display_downtown");
    let record = RecordActivityUseCase {
        repo: store.clone(),
    };
    record
        .execute(root.id, activity::CREATE_UNIT, "first".into(), None)
        .await;
    record
        .execute(admin.id, activity::UPDATE_RATES, "second".into(), None)
        .await;

    let records = ListActivityUseCase {
        repo: store.clone(),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entry.details, "second");
    assert_eq!(records[0].username.as_deref(), Some("downtown"));
    assert_eq!(records[0].role, Some(Role::Admin));
    assert_eq!(records[1].role, Some(Role::SuperAdmin));
}

#[tokio::test]
async fn should_keep_activity_of_deleted_actor() {
    let store = MemoryStore::default();
    let ghost = identity("ghost", Role::Admin);
    RecordActivityUseCase {
        repo: store.clone(),
    }
    .execute(ghost.id, activity::UPDATE_VIDEO, String::new(), None)
    .await;

    let records = ListActivityUseCase {
        repo: store.clone(),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].username.is_none());
    assert!(records[0].role.is_none());
}

#[tokio::test]
async fn should_cap_activity_listing() {
    let store = MemoryStore::default();
    let root = seeded_root(&store);
    let record = RecordActivityUseCase {
        repo: store.clone(),
    };
    for n in 0..RECENT_ACTIVITY_LIMIT + 3 {
        record
            .execute(root.id, activity::SEND_COMMAND, n.to_string(), None)
            .await;
    }

    let records = ListActivityUseCase {
        repo: store.clone(),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(records.len() as u64, RECENT_ACTIVITY_LIMIT);
}
