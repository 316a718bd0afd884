use crate::admin::dto::AdminAction;
use crate::form::handler::acknowledge;
use crate::gateway::Gateway;

pub const ADMIN_ONLY: &str = "❌ Только для администратора";
pub const ADMIN_WANTS_CONTACT: &str = "Админ хочет с вами связаться по вашей заявке.";
pub const PAYMENT_SENT: &str = "✅ Ваша заявка оплачена! 💸 Деньги скоро придут.";
pub const MARKED_PAID: &str = "Заявка отмечена как оплаченная ✅";

pub async fn handle_admin_action<G: Gateway + ?Sized>(
    gateway: &G,
    admin_chat_id: i64,
    query_id: &str,
    from_user_id: i64,
    action: AdminAction,
) {
    if from_user_id != admin_chat_id {
        log::warn!(
            "User {} tried admin action {:?} without permission",
            from_user_id,
            action
        );
        acknowledge(gateway, query_id, Some(ADMIN_ONLY), false).await;
        return;
    }

    let user_id = action.target_user();
    let (notice, toast) = match action {
        AdminAction::Reply(_) => (ADMIN_WANTS_CONTACT, None),
        AdminAction::MarkPaid(_) => (PAYMENT_SENT, Some(MARKED_PAID)),
    };

    if let Err(e) = gateway.send_text(user_id, notice, None).await {
        log::error!("Failed to notify user {} about {:?}: {}", user_id, action, e);
    } else {
        log::info!("Admin action {:?} delivered to user {}", action, user_id);
    }

    acknowledge(gateway, query_id, toast, false).await;
}
