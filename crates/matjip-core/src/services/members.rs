use reqwest::Method;
use tracing::info;

use crate::api::{endpoints, RequestClient, RequestError};
use crate::auth::Session;
use crate::models::{Member, MemberUpdate};

impl RequestClient {
    /// Member id of the logged-in member, if any.
    pub fn current_member_id(&self) -> Option<i64> {
        self.session()
            .get()
            .member_id
            .and_then(|id| id.parse().ok())
    }

    pub async fn fetch_member(&self, member_id: i64) -> Result<Member, RequestError> {
        self.get_json(&endpoints::member(member_id)).await
    }

    /// Update a profile. When it is the logged-in member's own profile the
    /// display fields in the session follow.
    pub async fn update_member(
        &self,
        member_id: i64,
        update: &MemberUpdate,
    ) -> Result<Member, RequestError> {
        let member: Member = self
            .send_json(Method::PUT, &endpoints::member(member_id), Some(update))
            .await?;

        if self.current_member_id() == Some(member.id) {
            self.session().set(&Session {
                nickname: Some(member.nickname.clone()),
                email: member.email.clone(),
                profile_image: member.profile_image.clone(),
                ..Session::default()
            });
        }

        Ok(member)
    }

    /// Delete an account. Deleting your own account also ends the session.
    pub async fn delete_member(&self, member_id: i64) -> Result<(), RequestError> {
        self.delete(&endpoints::member(member_id)).await?;

        if self.current_member_id() == Some(member_id) {
            self.session().clear();
            info!(member_id = member_id, "Account deleted, session cleared");
        }
        Ok(())
    }
}
