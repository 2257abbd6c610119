// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::logout,

        // --- Dashboard / Reports ---
        handlers::reports::dashboard,
        handlers::reports::monthly_revenue,
        handlers::reports::payment_methods,
        handlers::reports::commissions,
        handlers::reports::growth,

        // --- Calendar ---
        handlers::calendar::list_appointments,
        handlers::calendar::get_appointment,
        handlers::calendar::create_appointment,
        handlers::calendar::update_appointment,
        handlers::calendar::delete_appointment,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::list_client_orders,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Orders ---
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::update_order_status,
        handlers::orders::delete_order,

        // --- Inventory ---
        handlers::inventory::list_dresses,
        handlers::inventory::get_dress,
        handlers::inventory::create_dress,
        handlers::inventory::update_dress,
        handlers::inventory::delete_dress,

        // --- Payments ---
        handlers::payments::list_payments,
        handlers::payments::list_pending_payments,
        handlers::payments::record_payment,
        handlers::payments::delete_payment,

        // --- Settings ---
        handlers::settings::list_settings,
        handlers::settings::get_setting,
        handlers::settings::put_setting,
        handlers::settings::delete_setting,

        // --- Employees ---
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::create_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,

        // --- Locations ---
        handlers::locations::list_governorates,
        handlers::locations::create_governorate,
        handlers::locations::update_governorate,
        handlers::locations::delete_governorate,
        handlers::locations::list_cities,
        handlers::locations::create_city,
        handlers::locations::update_city,
        handlers::locations::delete_city,

        // --- Coupons ---
        handlers::coupons::list_coupons,
        handlers::coupons::get_coupon,
        handlers::coupons::create_coupon,
        handlers::coupons::update_coupon,
        handlers::coupons::delete_coupon,
        handlers::coupons::validate_coupon,

        // --- Catalog ---
        handlers::catalog::order_item_catalog,
    ),
    components(
        schemas(
            // --- Respostas genéricas ---
            common::responses::CreatedResponse,
            common::responses::SuccessResponse,
            common::responses::ListResponse,

            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catalog ---
            models::catalog::MakeupStyle,
            models::catalog::HairStyle,
            models::catalog::HennaStyle,
            models::catalog::PhotoPackage,
            models::catalog::ServiceKind,
            models::catalog::ServiceCategoryOptions,
            models::catalog::ItemTypeOption,
            models::catalog::OrderItemCatalog,

            // --- Clients ---
            models::client::Client,
            models::client::CreateClientPayload,
            models::client::UpdateClientPayload,

            // --- Orders ---
            models::order::OrderStatus,
            models::order::OrderItemType,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderSummary,
            models::order::BalanceState,
            models::order::OrderBalance,
            models::order::OrderView,
            models::order::OrderDetail,
            models::order::NewOrderItem,
            models::order::CreateOrderPayload,
            models::order::UpdateOrderPayload,
            models::order::UpdateOrderStatusPayload,

            // --- Payments ---
            models::payment::PaymentMethod,
            models::payment::Payment,
            models::payment::PaymentView,
            models::payment::CreatePaymentPayload,
            models::payment::PendingPayment,

            // --- Inventory ---
            models::dress::Dress,
            models::dress::CreateDressPayload,
            models::dress::UpdateDressPayload,

            // --- Calendar ---
            models::appointment::AppointmentStatus,
            models::appointment::Appointment,
            models::appointment::AppointmentView,
            models::appointment::CreateAppointmentPayload,
            models::appointment::UpdateAppointmentPayload,

            // --- Employees ---
            models::employee::CommissionRates,
            models::employee::Employee,
            models::employee::CreateEmployeePayload,
            models::employee::UpdateEmployeePayload,
            models::employee::EmployeeCommission,

            // --- Locations ---
            models::location::Governorate,
            models::location::City,
            models::location::CreateGovernoratePayload,
            models::location::UpdateGovernoratePayload,
            models::location::CreateCityPayload,
            models::location::UpdateCityPayload,

            // --- Coupons ---
            models::coupon::CouponType,
            models::coupon::CouponStatus,
            models::coupon::ReferralCoupon,
            models::coupon::CreateCouponPayload,
            models::coupon::UpdateCouponPayload,
            models::coupon::ValidateCouponPayload,
            models::coupon::CouponQuote,

            // --- Settings ---
            models::settings::SettingType,
            models::settings::SettingView,
            models::settings::PutSettingPayload,

            // --- Reports ---
            models::report::DashboardSummary,
            models::report::MonthlyRevenue,
            models::report::PaymentMethodBreakdown,
            models::report::GrowthMetric,
            models::report::GrowthReport,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Sessão"),
        (name = "Reports", description = "Painel e Relatórios Gerenciais"),
        (name = "Calendar", description = "Agenda de Atendimentos"),
        (name = "Clients", description = "Cadastro de Noivas e Clientes"),
        (name = "Orders", description = "Pedidos, Itens e Status"),
        (name = "Inventory", description = "Estoque de Vestidos"),
        (name = "Payments", description = "Pagamentos e Saldos em Aberto"),
        (name = "Settings", description = "Configurações do Sistema"),
        (name = "Employees", description = "Equipe e Comissões"),
        (name = "Locations", description = "Províncias, Cidades e Taxas de Entrega"),
        (name = "Coupons", description = "Cupons de Indicação"),
        (name = "Catalog", description = "Opções de Serviços para Itens de Pedido")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/auth/login",
            "/api/dashboard",
            "/api/calendar/appointments/{id}",
            "/api/orders/{id}/status",
            "/api/payments/pending",
            "/api/locations/governorates/{id}/cities",
            "/api/coupons/validate",
            "/api/catalog/order-items",
        ] {
            assert!(paths.contains_key(path), "rota sem documentação: {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
