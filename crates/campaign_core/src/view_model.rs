use crate::{Campaign, CampaignStatus, Credits, Notification, SubmissionPhase, VisibleError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mounted: bool,
    pub token: Option<String>,
    pub credits: Credits,
    pub error: Option<VisibleError>,
    pub campaign_name: String,
    pub urls_text: String,
    pub candidate_count: usize,
    pub invalid_urls: Vec<String>,
    pub phase: SubmissionPhase,
    /// False while a submission is in flight.
    pub submit_enabled: bool,
    pub campaigns: Vec<CampaignRowView>,
    pub notifications: Vec<Notification>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRowView {
    pub id: String,
    pub name: String,
    pub status: CampaignStatus,
    pub indexed_count: u64,
    pub total_urls: u64,
    /// Whole percent, clamped to 0..=100.
    pub progress_percent: u8,
}

impl CampaignRowView {
    pub fn from_campaign(campaign: &Campaign) -> Self {
        let progress_percent = if campaign.total_urls == 0 {
            0
        } else {
            let indexed = campaign.indexed_count.min(campaign.total_urls);
            (indexed.saturating_mul(100) / campaign.total_urls) as u8
        };
        Self {
            id: campaign.id.clone(),
            name: campaign.name.clone(),
            status: campaign.status.clone(),
            indexed_count: campaign.indexed_count,
            total_urls: campaign.total_urls,
            progress_percent,
        }
    }

    pub fn progress_label(&self) -> String {
        format!(
            "{} / {} ({}%)",
            self.indexed_count, self.total_urls, self.progress_percent
        )
    }
}
