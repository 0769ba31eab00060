use counterate_domain::change::{ChangeKind, ChangeSignal};

use counterate_signage::domain::repository::ChangePublisher;
use counterate_signage::infra::notifier::BroadcastNotifier;
use counterate_signage::usecase::rates::{DeleteRateUseCase, SaveRateInput, SaveRateUseCase};

use crate::helpers::{MemoryStore, seed_unit, snapshot_uc};

fn input() -> SaveRateInput {
    SaveRateInput {
        id: None,
        currency: "JPY".to_owned(),
        tt_buy: 101.5,
        tt_sell: 104.0,
        bank_buy: 100.0,
        bank_sell: 105.5,
        order: 1,
        active: true,
    }
}

#[tokio::test]
async fn should_succeed_mutation_with_zero_subscribers() {
    let store = MemoryStore::default();
    let (admin, display) = seed_unit(&store, "a1", "d1");
    let notifier = BroadcastNotifier::new(8);
    assert_eq!(notifier.receiver_count(), 0);

    let rate = SaveRateUseCase {
        repo: store.clone(),
        notifier: notifier.clone(),
    }
    .execute(admin.id, input())
    .await
    .unwrap();

    assert_eq!(store.rate_count(), 1);
    let snapshot = snapshot_uc(&store).execute(display.id).await.unwrap();
    assert_eq!(snapshot.rates[0].id, rate.id);
}

#[tokio::test]
async fn should_signal_every_connected_terminal() {
    let store = MemoryStore::default();
    let (admin, _) = seed_unit(&store, "a1", "d1");
    let notifier = BroadcastNotifier::new(8);
    let mut first = notifier.subscribe();
    let mut second = notifier.subscribe();

    let rate = SaveRateUseCase {
        repo: store.clone(),
        notifier: notifier.clone(),
    }
    .execute(admin.id, input())
    .await
    .unwrap();
    DeleteRateUseCase {
        repo: store.clone(),
        notifier: notifier.clone(),
    }
    .execute(admin.id, rate.id)
    .await
    .unwrap();

    for rx in [&mut first, &mut second] {
        assert_eq!(rx.recv().await.unwrap(), ChangeSignal::new(ChangeKind::Rates));
        assert_eq!(rx.recv().await.unwrap(), ChangeSignal::new(ChangeKind::Rates));
    }
}

#[tokio::test]
async fn should_not_replay_signals_to_late_subscribers() {
    let notifier = BroadcastNotifier::new(8);
    notifier.publish(ChangeKind::Video);

    let mut late = notifier.subscribe();

    assert!(late.try_recv().is_err());
}
