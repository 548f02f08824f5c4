use crate::profile::FarmerProfile;
use crate::scenario::Scenario;
use chrono::Utc;
use dashmap::DashMap;
use tracing::trace;

/// Farmer profiles and their most recent scenario pair.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: DashMap<String, FarmerProfile>,
    scenarios: DashMap<String, Vec<Scenario>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, farmer_id: &str) -> Option<FarmerProfile> {
        self.profiles.get(farmer_id).map(|entry| entry.value().clone())
    }

    /// Insert or replace a profile, stamping `last_updated`.
    pub fn save(&self, mut profile: FarmerProfile) -> FarmerProfile {
        profile.last_updated = Utc::now();
        trace!(farmer = %profile.farmer_id, crops = ?profile.main_crops, "Saving profile");
        self.profiles
            .insert(profile.farmer_id.clone(), profile.clone());
        profile
    }

    /// Remove a profile and its scenarios. Returns the removed profile.
    pub fn remove(&self, farmer_id: &str) -> Option<FarmerProfile> {
        self.scenarios.remove(farmer_id);
        self.profiles.remove(farmer_id).map(|(_, p)| p)
    }

    pub fn scenarios(&self, farmer_id: &str) -> Vec<Scenario> {
        self.scenarios
            .get(farmer_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Replace the stored scenario set for a farmer.
    pub fn save_scenarios(&self, farmer_id: &str, scenarios: Vec<Scenario>) {
        self.scenarios.insert(farmer_id.to_string(), scenarios);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn clear(&self) {
        self.profiles.clear();
        self.scenarios.clear();
    }
}
