use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use counterate_core::health::healthz;
use counterate_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{
        delete_deposit, delete_rate, get_branding, get_display, get_video, list_deposits,
        list_rates, replace_video, reset_display_credential, save_deposit, save_rate,
        send_command as admin_send_command, update_branding,
    },
    display::{change_events, drain_command, get_snapshot},
    readyz,
    superadmin::{
        create_super_admin, create_unit, delete_unit, list_activity, list_units,
        reset_credential, send_command, set_status, update_profile, update_unit,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Terminal
        .route("/display/snapshot", get(get_snapshot))
        .route("/display/commands/drain", post(drain_command))
        .route("/display/events", get(change_events))
        // Unit admin
        .route("/admin/rates", get(list_rates).post(save_rate))
        .route("/admin/rates/{id}", delete(delete_rate))
        .route("/admin/deposits", get(list_deposits).post(save_deposit))
        .route("/admin/deposits/{id}", delete(delete_deposit))
        .route("/admin/video", get(get_video).put(replace_video))
        .route("/admin/branding", get(get_branding).patch(update_branding))
        .route("/admin/display", get(get_display))
        .route("/admin/display/command", post(admin_send_command))
        .route("/admin/display/credential", post(reset_display_credential))
        // Super-admin
        .route("/superadmin/units", get(list_units).post(create_unit))
        .route("/superadmin/units/{admin_id}", patch(update_unit).delete(delete_unit))
        .route("/superadmin/units/{admin_id}/command", post(send_command))
        .route("/superadmin/identities/{id}/status", patch(set_status))
        .route("/superadmin/identities/{id}/credential", post(reset_credential))
        .route("/superadmin/admins", post(create_super_admin))
        .route("/superadmin/profile", patch(update_profile))
        .route("/superadmin/activity", get(list_activity))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
