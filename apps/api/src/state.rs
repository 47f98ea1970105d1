use pratibha_application::{
    ActivityService, CatalogService, EmailTokenService, RateLimitService, RecordsService,
    RosterService, SearchService, UserService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub email_token_service: EmailTokenService,
    pub activity_service: ActivityService,
    pub catalog_service: CatalogService,
    pub roster_service: RosterService,
    pub records_service: RecordsService,
    pub search_service: SearchService,
    pub rate_limit_service: RateLimitService,
    pub pool: PgPool,
    pub frontend_url: String,
}
