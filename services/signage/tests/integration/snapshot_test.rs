use counterate_domain::change::ChangeKind;
use counterate_domain::identity::Role;
use counterate_domain::snapshot::DisplayState;

use counterate_signage::domain::types::{BrandingPatch, UnitConfig};
use counterate_signage::usecase::branding::UpdateBrandingUseCase;
use counterate_signage::usecase::rates::{
    SaveDepositInput, SaveDepositUseCase, SaveRateInput, SaveRateUseCase,
};
use counterate_signage::usecase::video::ReplaceVideoUseCase;

use crate::helpers::{MemoryStore, RecordingNotifier, identity, seed_unit, snapshot_uc};

fn rate_input(currency: &str, order: i32, active: bool) -> SaveRateInput {
    SaveRateInput {
        id: None,
        currency: currency.to_owned(),
        tt_buy: 15_800.0,
        tt_sell: 16_100.0,
        bank_buy: 15_750.0,
        bank_sell: 16_150.0,
        order,
        active,
    }
}

fn save_rate_uc(store: &MemoryStore) -> SaveRateUseCase<MemoryStore, RecordingNotifier> {
    SaveRateUseCase {
        repo: store.clone(),
        notifier: RecordingNotifier::default(),
    }
}

#[tokio::test]
async fn should_show_active_rate_and_hide_it_once_deactivated() {
    let store = MemoryStore::default();
    let (admin, display) = seed_unit(&store, "a1", "d1");
    let save = save_rate_uc(&store);

    let rate = save.execute(admin.id, rate_input("usd", 1, true)).await.unwrap();

    let snapshot = snapshot_uc(&store).execute(display.id).await.unwrap();
    assert_eq!(snapshot.unit_admin_id, admin.id);
    assert_eq!(snapshot.rates.len(), 1);
    assert_eq!(snapshot.rates[0].id, rate.id);
    assert_eq!(snapshot.rates[0].currency, "USD");
    assert_eq!(snapshot.rates[0].order, 1);

    let mut input = rate_input("usd", 1, false);
    input.id = Some(rate.id);
    save.execute(admin.id, input).await.unwrap();

    let snapshot = snapshot_uc(&store).execute(display.id).await.unwrap();
    assert!(snapshot.rates.is_empty());
}

#[tokio::test]
async fn should_order_rates_by_explicit_order() {
    let store = MemoryStore::default();
    let (admin, display) = seed_unit(&store, "a1", "d1");
    let save = save_rate_uc(&store);

    save.execute(admin.id, rate_input("EUR", 2, true)).await.unwrap();
    save.execute(admin.id, rate_input("USD", 1, true)).await.unwrap();

    let snapshot = snapshot_uc(&store).execute(display.id).await.unwrap();
    let orders: Vec<i32> = snapshot.rates.iter().map(|r| r.order).collect();
    assert_eq!(orders, vec![1, 2]);
    assert_eq!(snapshot.rates[0].currency, "USD");
}

#[tokio::test]
async fn should_order_deposits_by_tenor() {
    let store = MemoryStore::default();
    let (admin, display) = seed_unit(&store, "a1", "d1");
    let save = SaveDepositUseCase {
        repo: store.clone(),
        notifier: RecordingNotifier::default(),
    };

    for (tenor, active) in [(12, true), (1, true), (6, false)] {
        save.execute(
            admin.id,
            SaveDepositInput {
                id: None,
                tenor,
                rate: 4.25,
                order: 0,
                active,
            },
        )
        .await
        .unwrap();
    }

    let snapshot = snapshot_uc(&store).execute(display.id).await.unwrap();
    let tenors: Vec<i32> = snapshot.deposits.iter().map(|d| d.tenor).collect();
    assert_eq!(tenors, vec![1, 12]);
}

#[tokio::test]
async fn should_reflect_every_admin_mutation_on_next_read() {
    let store = MemoryStore::default();
    let (admin, display) = seed_unit(&store, "a1", "d1");
    let notifier = RecordingNotifier::default();

    SaveRateUseCase {
        repo: store.clone(),
        notifier: notifier.clone(),
    }
    .execute(admin.id, rate_input("SGD", 1, true))
    .await
    .unwrap();
    ReplaceVideoUseCase {
        repo: store.clone(),
        notifier: notifier.clone(),
    }
    .execute(admin.id, true, vec!["https://cdn.example/intro.mp4".to_owned()])
    .await
    .unwrap();
    UpdateBrandingUseCase {
        repo: store.clone(),
        notifier: notifier.clone(),
        marquee_text: "Welcome".to_owned(),
    }
    .execute(
        admin.id,
        BrandingPatch {
            marquee_text: Some("Rates updated daily".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let snapshot = snapshot_uc(&store).execute(display.id).await.unwrap();
    assert_eq!(snapshot.rates.len(), 1);
    assert_eq!(
        snapshot.video.unwrap().sources,
        vec!["https://cdn.example/intro.mp4".to_owned()]
    );
    assert_eq!(snapshot.config.marquee_text, "Rates updated daily");
    assert_eq!(
        notifier.published(),
        vec![ChangeKind::Rates, ChangeKind::Video, ChangeKind::Branding]
    );
}

#[tokio::test]
async fn should_create_missing_config_on_first_read() {
    let store = MemoryStore::default();
    let (admin, display) = seed_unit(&store, "a1", "d1");
    assert!(store.config(admin.id).is_none());

    let snapshot = snapshot_uc(&store).execute(display.id).await.unwrap();

    assert_eq!(snapshot.config.refresh_interval, UnitConfig::DEFAULT_REFRESH_INTERVAL);
    assert_eq!(snapshot.config.theme, UnitConfig::DEFAULT_THEME);
    assert!(store.config(admin.id).is_some());
}

#[tokio::test]
async fn should_never_read_another_units_rows() {
    let store = MemoryStore::default();
    let (admin_a, _) = seed_unit(&store, "a1", "d1");
    let (_, display_b) = seed_unit(&store, "a2", "d2");
    save_rate_uc(&store)
        .execute(admin_a.id, rate_input("USD", 1, true))
        .await
        .unwrap();

    let snapshot = snapshot_uc(&store).execute(display_b.id).await.unwrap();

    assert!(snapshot.rates.is_empty());
}

#[tokio::test]
async fn should_render_unconfigured_for_superadmin_without_unit() {
    let store = MemoryStore::default();
    let root = identity("root", Role::SuperAdmin);
    store.insert_identity(root.clone());

    let state = DisplayState::from(snapshot_uc(&store).execute(root.id).await);

    assert_eq!(state, DisplayState::Unconfigured);
}
