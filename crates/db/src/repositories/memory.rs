use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use washdesk_core::domain::customer::{Customer, CustomerId};
use washdesk_core::domain::pricing::{PricingConfigId, PricingConfiguration};
use washdesk_core::domain::quote::{Quote, QuoteNumber};
use washdesk_core::errors::DomainError;
use washdesk_core::pricing::resolution::select_configuration;

use super::{CustomerRepository, PricingConfigRepository, QuoteRepository, RepositoryError};

/// In-memory stand-in for the SQLite store, mirroring its behavior:
/// cascade delete of a customer's quotes, protect-on-delete for referenced
/// configurations, and the compute-if-absent total guard on quote save.
#[derive(Default)]
pub struct InMemoryAdminStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    configs: RwLock<HashMap<PricingConfigId, PricingConfiguration>>,
    quotes: RwLock<HashMap<QuoteNumber, Quote>>,
}

#[async_trait::async_trait]
impl PricingConfigRepository for InMemoryAdminStore {
    async fn find_by_id(
        &self,
        id: &PricingConfigId,
    ) -> Result<Option<PricingConfiguration>, RepositoryError> {
        let configs = self.configs.read().await;
        Ok(configs.get(id).cloned())
    }

    async fn find_active(&self) -> Result<Vec<PricingConfiguration>, RepositoryError> {
        let configs = self.configs.read().await;
        let mut active: Vec<PricingConfiguration> =
            configs.values().filter(|config| config.is_active).cloned().collect();
        active.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(active)
    }

    async fn find_most_recently_updated(
        &self,
    ) -> Result<Option<PricingConfiguration>, RepositoryError> {
        let configs = self.configs.read().await;
        Ok(configs.values().max_by_key(|config| config.updated_at).cloned())
    }

    async fn list(&self) -> Result<Vec<PricingConfiguration>, RepositoryError> {
        let configs = self.configs.read().await;
        let mut all: Vec<PricingConfiguration> = configs.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn save(&self, mut config: PricingConfiguration) -> Result<(), RepositoryError> {
        config.touch();
        let mut configs = self.configs.write().await;
        configs.insert(config.id.clone(), config);
        Ok(())
    }

    async fn delete(&self, id: &PricingConfigId) -> Result<(), RepositoryError> {
        // Lock order is configs before quotes, same as quote save.
        let mut configs = self.configs.write().await;
        let quotes = self.quotes.read().await;
        if quotes.values().any(|quote| &quote.pricing_id == id) {
            return Err(RepositoryError::ConfigurationInUse { id: id.clone() });
        }
        configs.remove(id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryAdminStore {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn save(&self, mut customer: Customer) -> Result<(), RepositoryError> {
        customer.updated_at = Utc::now();
        let mut customers = self.customers.write().await;
        customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), RepositoryError> {
        let mut customers = self.customers.write().await;
        customers.remove(id);
        let mut quotes = self.quotes.write().await;
        quotes.retain(|_, quote| &quote.customer_id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl QuoteRepository for InMemoryAdminStore {
    async fn find_by_number(
        &self,
        number: &QuoteNumber,
    ) -> Result<Option<Quote>, RepositoryError> {
        let quotes = self.quotes.read().await;
        Ok(quotes.get(number).cloned())
    }

    async fn list_for_customer(&self, id: &CustomerId) -> Result<Vec<Quote>, RepositoryError> {
        let quotes = self.quotes.read().await;
        let mut matching: Vec<Quote> =
            quotes.values().filter(|quote| &quote.customer_id == id).cloned().collect();
        matching.sort_by(|a, b| b.quote_date.cmp(&a.quote_date));
        Ok(matching)
    }

    async fn save(&self, mut quote: Quote) -> Result<Quote, RepositoryError> {
        quote.selections.validate()?;

        // The configuration guard stays held until the quote is inserted, so
        // a concurrent delete cannot remove the referenced configuration in
        // between. Lock order is configs before quotes, same as config delete.
        let configs = self.configs.read().await;
        let config = configs.get(&quote.pricing_id).ok_or_else(|| {
            RepositoryError::MissingPricingConfiguration { id: quote.pricing_id.clone() }
        })?;
        if !quote.has_total() {
            quote.ensure_total(&config.rate_snapshot()).map_err(DomainError::from)?;
        }

        quote.updated_at = Utc::now();
        let mut quotes = self.quotes.write().await;
        quotes.insert(quote.number.clone(), quote.clone());
        Ok(quote)
    }

    async fn delete(&self, number: &QuoteNumber) -> Result<(), RepositoryError> {
        let mut quotes = self.quotes.write().await;
        quotes.remove(number);
        Ok(())
    }
}

impl InMemoryAdminStore {
    /// Resolution over the in-memory set, matching the SQL policy.
    pub async fn resolve_configuration(&self) -> Option<PricingConfiguration> {
        let configs = self.configs.read().await;
        let all: Vec<PricingConfiguration> = configs.values().cloned().collect();
        select_configuration(&all).cloned()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use washdesk_core::domain::customer::Customer;
    use washdesk_core::domain::pricing::PricingConfiguration;
    use washdesk_core::domain::quote::{Quote, QuoteNumber, ServiceSelections};

    use crate::repositories::{
        CustomerRepository, PricingConfigRepository, QuoteRepository, RepositoryError,
    };

    use super::InMemoryAdminStore;

    async fn store_with_config() -> (InMemoryAdminStore, PricingConfiguration) {
        let store = InMemoryAdminStore::default();
        let config = PricingConfiguration::with_default_rates("standard");
        PricingConfigRepository::save(&store, config.clone()).await.expect("save config");
        (store, config)
    }

    fn quote_for(config: &PricingConfiguration, customer: &Customer) -> Quote {
        Quote::new(
            QuoteNumber("Q-2001".to_string()),
            customer.id.clone(),
            config.id.clone(),
            ServiceSelections { house_sqft: 100, ..ServiceSelections::default() },
        )
    }

    #[tokio::test]
    async fn save_fixes_the_total_on_first_write() {
        let (store, config) = store_with_config().await;
        let customer = Customer::new("Ira", "Song");
        CustomerRepository::save(&store, customer.clone()).await.expect("save customer");

        let saved =
            QuoteRepository::save(&store, quote_for(&config, &customer)).await.expect("save quote");
        assert_eq!(saved.total_amount, Some(Decimal::new(5000, 2)));
    }

    #[tokio::test]
    async fn delete_of_referenced_configuration_is_rejected() {
        let (store, config) = store_with_config().await;
        let customer = Customer::new("Ira", "Song");
        CustomerRepository::save(&store, customer.clone()).await.expect("save customer");
        QuoteRepository::save(&store, quote_for(&config, &customer)).await.expect("save quote");

        let error = PricingConfigRepository::delete(&store, &config.id)
            .await
            .expect_err("delete should be rejected");
        assert!(matches!(error, RepositoryError::ConfigurationInUse { .. }));
    }

    #[tokio::test]
    async fn delete_succeeds_once_no_quotes_reference_the_configuration() {
        let (store, config) = store_with_config().await;
        let customer = Customer::new("Ira", "Song");
        CustomerRepository::save(&store, customer.clone()).await.expect("save customer");
        let saved = QuoteRepository::save(&store, quote_for(&config, &customer)).await.expect("save quote");

        QuoteRepository::delete(&store, &saved.number).await.expect("delete quote");
        PricingConfigRepository::delete(&store, &config.id).await.expect("delete config");
        assert!(PricingConfigRepository::find_by_id(&store, &config.id)
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn deleting_a_customer_cascades_to_their_quotes() {
        let (store, config) = store_with_config().await;
        let customer = Customer::new("Ira", "Song");
        CustomerRepository::save(&store, customer.clone()).await.expect("save customer");
        let saved = QuoteRepository::save(&store, quote_for(&config, &customer)).await.expect("save quote");

        CustomerRepository::delete(&store, &customer.id).await.expect("delete customer");
        assert!(store.find_by_number(&saved.number).await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn missing_configuration_is_reported_at_save() {
        let store = InMemoryAdminStore::default();
        let customer = Customer::new("Ira", "Song");
        CustomerRepository::save(&store, customer.clone()).await.expect("save customer");
        let orphan = PricingConfiguration::with_default_rates("never-saved");

        let error = QuoteRepository::save(&store, quote_for(&orphan, &customer))
            .await
            .expect_err("save should fail without the configuration");
        assert!(matches!(error, RepositoryError::MissingPricingConfiguration { .. }));
    }

    #[tokio::test]
    async fn preset_total_does_not_skip_the_configuration_check() {
        let store = InMemoryAdminStore::default();
        let customer = Customer::new("Ira", "Song");
        CustomerRepository::save(&store, customer.clone()).await.expect("save customer");
        let orphan = PricingConfiguration::with_default_rates("never-saved");
        let mut quote = quote_for(&orphan, &customer);
        quote.total_amount = Some(Decimal::new(4200, 2));

        let error = QuoteRepository::save(&store, quote)
            .await
            .expect_err("save should fail without the configuration");
        assert!(matches!(error, RepositoryError::MissingPricingConfiguration { .. }));
    }
}
