//! Profile editing

use async_trait::async_trait;
use storefront_common::{DataFactory, ProfileUpdate, UserOverrides};

use crate::error::{ensure, E2eResult};
use crate::pages::ProfilePage;
use crate::scenario::{Scenario, ScenarioCase};

pub struct UpdateProfile;

#[async_trait]
impl ScenarioCase for UpdateProfile {
    fn name(&self) -> &'static str {
        "update_profile"
    }

    fn description(&self) -> &'static str {
        "Phone and address saved in the profile form are returned by the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["profile"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        let initial = s.auth.get_profile(&token).await?;

        let update = DataFactory::profile_update(ProfileUpdate::default());
        let phone = update.phone.unwrap_or_default();
        let address = update.address.unwrap_or_default();

        let flow = Scenario::login_flow(&account)
            .then_all(ProfilePage::open_via_ui())
            .then_all(ProfilePage::update(None, Some(&phone), Some(&address)))
            .then(ProfilePage::saved("saved"));
        let ui = s.run_ui(&flow).await?;

        let updated = s.auth.get_profile(&token).await?;

        ensure(initial.phone != phone, "generated phone should differ from the current one")?;
        ensure(initial.address != address, "generated address should differ from the current one")?;
        ensure(ui.flag("saved"), "profile should return to display mode after saving")?;
        ensure(
            updated.phone == phone,
            format!("phone should be {}, API has {}", phone, updated.phone),
        )?;
        ensure(
            updated.address == address,
            format!("address should be {}, API has {}", address, updated.address),
        )
    }
}
