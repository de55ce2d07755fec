use std::sync::Arc;

use rand::{rngs::OsRng, RngCore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::AuthManager,
    config::{Config, LogFormat},
};
use tallybook_core::{
    accounts::{AccountService, AccountServiceTrait},
    budgets::{BudgetService, BudgetServiceTrait},
    categories::{CategoryService, CategoryServiceTrait},
    export::{ExportService, ExportServiceTrait},
    fx::{CurrencyConverter, CurrencyConverterTrait, HttpRateProvider, InMemoryRateCache},
    import::{ImportService, ImportServiceTrait},
    reports::{ReportsService, ReportsServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    users::{UserService, UserServiceTrait},
};
use tallybook_storage_sqlite::{
    AccountRepository, BudgetRepository, CategoryRepository, TransactionRepository,
    UserRepository,
};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub account_service: Arc<dyn AccountServiceTrait + Send + Sync>,
    pub category_service: Arc<dyn CategoryServiceTrait + Send + Sync>,
    pub transaction_service: Arc<dyn TransactionServiceTrait + Send + Sync>,
    pub budget_service: Arc<dyn BudgetServiceTrait + Send + Sync>,
    pub import_service: Arc<dyn ImportServiceTrait + Send + Sync>,
    pub export_service: Arc<dyn ExportServiceTrait + Send + Sync>,
    pub reports_service: Arc<dyn ReportsServiceTrait + Send + Sync>,
    pub currency_converter: Arc<dyn CurrencyConverterTrait + Send + Sync>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let (pool, writer) = tallybook_storage_sqlite::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let jwt_secret = match &config.jwt_secret {
        Some(secret) => secret.clone(),
        None => {
            tracing::warn!("TB_JWT_SECRET is not set; tokens will not survive a restart");
            let mut secret = vec![0u8; 32];
            OsRng.fill_bytes(&mut secret);
            secret
        }
    };
    let auth = Arc::new(AuthManager::new(&jwt_secret, config.token_ttl));

    let user_repo = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let account_repo = Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let category_repo = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let transaction_repo = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let budget_repo = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(user_repo.clone()));
    let account_service = Arc::new(AccountService::new(account_repo.clone()));
    let category_service = Arc::new(CategoryService::new(category_repo.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repo.clone(),
        account_repo.clone(),
        category_repo.clone(),
    ));
    let budget_service = Arc::new(BudgetService::new(
        budget_repo,
        category_repo.clone(),
        transaction_repo.clone(),
    ));
    let import_service = Arc::new(ImportService::new(
        transaction_service.clone(),
        account_repo.clone(),
        category_repo,
        user_repo.clone(),
    ));
    let export_service = Arc::new(ExportService::new(transaction_repo.clone()));

    let currency_converter = Arc::new(CurrencyConverter::new(
        Arc::new(HttpRateProvider::new(
            config.fx_base_url.clone(),
            config.fx_timeout,
        )),
        Arc::new(InMemoryRateCache::with_ttl(config.fx_cache_ttl)),
    ));
    let reports_service = Arc::new(ReportsService::new(
        account_repo,
        transaction_repo,
        user_repo,
        budget_service.clone(),
        currency_converter.clone(),
    ));

    Ok(Arc::new(AppState {
        user_service,
        account_service,
        category_service,
        transaction_service,
        budget_service,
        import_service,
        export_service,
        reports_service,
        currency_converter,
        auth,
    }))
}
