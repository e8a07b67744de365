//! Community group link resolution and management.

use sea_orm::Set;
use techsprint_common::{AppError, AppResult, IdGenerator};
use techsprint_db::{
    entities::{group_link, group_link::CollegeGroup},
    repositories::GroupLinkRepository,
};

/// Group link service.
#[derive(Clone)]
pub struct GroupLinkService {
    link_repo: GroupLinkRepository,
    id_gen: IdGenerator,
    /// Used when the store lookup itself fails, so an approval email still
    /// carries a join link.
    fallback_link: Option<String>,
}

/// Classify a college string into a link group.
///
/// Anything containing "RGM" (case-insensitive) counts as the host college;
/// everything else shares the common group.
#[must_use]
pub fn classify_college(college: &str) -> CollegeGroup {
    if college.to_uppercase().contains("RGM") {
        CollegeGroup::Rgm
    } else {
        CollegeGroup::Others
    }
}

impl GroupLinkService {
    /// Create a new group link service.
    #[must_use]
    pub const fn new(link_repo: GroupLinkRepository, fallback_link: Option<String>) -> Self {
        Self {
            link_repo,
            id_gen: IdGenerator::new(),
            fallback_link,
        }
    }

    /// Resolve the invitation link for a registrant's college.
    ///
    /// `None` means no active link exists for the classification; the
    /// approval email degrades to its no-button variant. A store error falls
    /// back to the configured link instead of blocking the approval.
    pub async fn resolve(&self, college: &str) -> Option<String> {
        let group = classify_college(college);

        match self.link_repo.find_active_by_college(group).await {
            Ok(link) => link.map(|l| l.whatsapp_link),
            Err(e) => {
                tracing::warn!(college = college, error = %e, "Group link lookup failed, using fallback");
                self.fallback_link.clone()
            }
        }
    }

    /// List all links (main admin).
    pub async fn list(&self) -> AppResult<Vec<group_link::Model>> {
        self.link_repo.list().await
    }

    /// Create a new link (main admin).
    pub async fn create(
        &self,
        college: CollegeGroup,
        whatsapp_link: &str,
    ) -> AppResult<group_link::Model> {
        let whatsapp_link = whatsapp_link.trim();
        if whatsapp_link.is_empty() {
            return Err(AppError::BadRequest("Link is required".to_string()));
        }

        let model = group_link::ActiveModel {
            id: Set(self.id_gen.generate()),
            college: Set(college),
            whatsapp_link: Set(whatsapp_link.to_string()),
            active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.link_repo.create(model).await
    }

    /// Activate or deactivate a link (main admin).
    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<group_link::Model> {
        let link = self.link_repo.get_by_id(id).await?;
        let mut model: group_link::ActiveModel = link.into();
        model.active = Set(active);
        self.link_repo.update(model).await
    }

    /// Delete a link (main admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.link_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("Group link {id}")));
        }
        Ok(())
    }
}
