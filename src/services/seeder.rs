// Seeder - the ordered write pipeline for one seed scenario

use tracing::info;

use crate::config::SeedScenario;
use crate::domain::{
    self, Crop, CropId, Diagnosis, DiagnosisId, FarmerId, FarmerProfile, Product, ProductId,
    UserId, UserProfile,
};
use crate::error::SeedError;
use crate::store::DocumentStore;

/// Identifiers of everything one run wrote
#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub user: UserId,
    pub farmer: FarmerId,
    pub crop: CropId,
    pub diagnosis: DiagnosisId,
    pub product: ProductId,
}

impl SeedReport {
    /// `collection/id` of each write, in commit order
    pub fn document_paths(&self) -> Vec<String> {
        vec![
            format!("{}/{}", domain::USERS, self.user),
            format!("{}/{}", domain::FARMERS, self.farmer),
            format!("{}/{}", domain::CROPS, self.crop),
            format!("{}/{}", domain::DIAGNOSES, self.diagnosis),
            format!("{}/{}", domain::PRODUCTS, self.product),
        ]
    }
}

/// Writes scenario entities one at a time. Every step is its own commit:
/// a failure leaves earlier steps in place.
pub struct Seeder<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> Seeder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upsert the user at its fixed id
    pub async fn seed_user(&self, user: &UserProfile) -> Result<UserId, SeedError> {
        let id = user.user_id();
        self.store
            .set(domain::USERS, id.as_str(), &user.to_document())
            .await?;
        info!("Wrote {}/{}", domain::USERS, id);
        Ok(id)
    }

    pub async fn seed_farmer(&self, farmer: &FarmerProfile, owner: &UserId) -> Result<FarmerId, SeedError> {
        let id = self
            .store
            .add(domain::FARMERS, &farmer.to_document(owner))
            .await?;
        info!("Wrote {}/{} (owner {})", domain::FARMERS, id, owner);
        Ok(FarmerId::new(id))
    }

    pub async fn seed_crop(&self, crop: &Crop, farmer: &FarmerId) -> Result<CropId, SeedError> {
        let id = self
            .store
            .add(domain::CROPS, &crop.to_document(farmer))
            .await?;
        info!("Wrote {}/{} (farmer {})", domain::CROPS, id, farmer);
        Ok(CropId::new(id))
    }

    pub async fn seed_diagnosis(
        &self,
        diagnosis: &Diagnosis,
        farmer: &FarmerId,
        crop: &CropId,
        reporter: &UserId,
    ) -> Result<DiagnosisId, SeedError> {
        let id = self
            .store
            .add(domain::DIAGNOSES, &diagnosis.to_document(farmer, crop, reporter))
            .await?;
        info!("Wrote {}/{} (farmer {}, crop {})", domain::DIAGNOSES, id, farmer, crop);
        Ok(DiagnosisId::new(id))
    }

    pub async fn seed_product(&self, product: &Product, seller: &UserId) -> Result<ProductId, SeedError> {
        let id = self
            .store
            .add(domain::PRODUCTS, &product.to_document(seller))
            .await?;
        info!("Wrote {}/{} (seller {})", domain::PRODUCTS, id, seller);
        Ok(ProductId::new(id))
    }

    /// Run all five writes in dependency order, stopping at the first failure
    pub async fn run(&self, scenario: &SeedScenario) -> Result<SeedReport, SeedError> {
        info!("Step 1/5: user");
        let user = self.seed_user(&scenario.user).await?;

        info!("Step 2/5: farmer");
        let farmer = self.seed_farmer(&scenario.farmer, &user).await?;

        info!("Step 3/5: crop");
        let crop = self.seed_crop(&scenario.crop, &farmer).await?;

        info!("Step 4/5: diagnosis");
        let diagnosis = self
            .seed_diagnosis(&scenario.diagnosis, &farmer, &crop, &user)
            .await?;

        info!("Step 5/5: product");
        let product = self.seed_product(&scenario.product, &user).await?;

        Ok(SeedReport {
            user,
            farmer,
            crop,
            diagnosis,
            product,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[tokio::test]
    async fn test_run_links_generated_ids() {
        let store = InMemoryStore::new();
        let report = Seeder::new(&store).run(&SeedScenario::default()).await.unwrap();

        let crop = store.get(domain::CROPS, report.crop.as_str()).unwrap();
        assert_eq!(crop.get_str("farmerId"), Some(report.farmer.as_str()));

        let diagnosis = store.get(domain::DIAGNOSES, report.diagnosis.as_str()).unwrap();
        assert_eq!(diagnosis.get_str("farmerId"), Some(report.farmer.as_str()));
        assert_eq!(diagnosis.get_str("cropId"), Some(report.crop.as_str()));
        assert_eq!(diagnosis.get_str("reportedByUid"), Some(report.user.as_str()));
    }

    #[tokio::test]
    async fn test_writes_happen_in_dependency_order() {
        let store = InMemoryStore::new();
        let report = Seeder::new(&store).run(&SeedScenario::default()).await.unwrap();

        let order: Vec<String> = store
            .write_log()
            .into_iter()
            .map(|w| format!("{}/{}", w.collection, w.id))
            .collect();
        assert_eq!(order, report.document_paths());
    }
}
