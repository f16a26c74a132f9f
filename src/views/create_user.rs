use iced::{
    Alignment, Element, Length,
    widget::{button, checkbox, column, container, row, text, text_input},
};

use crate::app::message::{CreateUserMessage, Message};
use crate::core::{
    model::{AvailableModule, ModuleGrant},
    store::CreateUserRequest,
};
use crate::styles::{self, font_size, spacing};

#[derive(Debug, Clone)]
pub struct ModuleChoice {
    pub module: AvailableModule,
    pub selected: bool,
}

/// Create-user dialog state. The customer is prefilled and read-only;
/// the module checklist exists only while module selection is enabled.
#[derive(Debug)]
pub struct CreateUserState {
    pub customer: String,
    pub user: String,
    pub role: String,
    pub module_selection: bool,
    pub modules: Vec<ModuleChoice>,
    pub submitting: bool,
    pub error: Option<String>,
}

impl CreateUserState {
    pub fn new(customer: String, module_selection: bool) -> Self {
        Self {
            customer,
            user: String::new(),
            role: String::new(),
            module_selection,
            modules: Vec::new(),
            submitting: false,
            error: None,
        }
    }

    pub fn set_catalog(&mut self, catalog: Vec<AvailableModule>) {
        self.modules = catalog
            .into_iter()
            .map(|module| ModuleChoice {
                module,
                selected: false,
            })
            .collect();
    }

    pub fn toggle_module(&mut self, key: &str, selected: bool) {
        if let Some(choice) = self.modules.iter_mut().find(|c| c.module.module_key == key) {
            choice.selected = selected;
        }
    }

    /// The `user` field is the only required input.
    pub fn validate(&self) -> Result<(), String> {
        if self.user.trim().is_empty() {
            Err("User is required".to_string())
        } else {
            Ok(())
        }
    }

    pub fn request(&self) -> CreateUserRequest {
        let role = self.role.trim();
        CreateUserRequest {
            customer: self.customer.clone(),
            user: self.user.trim().to_string(),
            role: (!role.is_empty()).then(|| role.to_string()),
            modules: self.module_selection.then(|| {
                self.modules
                    .iter()
                    .filter(|choice| choice.selected)
                    .map(|choice| ModuleGrant {
                        module_key: choice.module.module_key.clone(),
                        module_name: choice.module.module_name.clone(),
                        enabled: true,
                    })
                    .collect()
            }),
        }
    }
}

pub fn view<'a>(state: &'a CreateUserState) -> Element<'a, Message> {
    // No on_input: the customer field stays read-only.
    let customer_field = field(
        "Customer",
        text_input("", &state.customer).padding(8).size(font_size::BODY),
    );

    let user_field = field(
        "User",
        text_input("user@example.com", &state.user)
            .on_input(|value| Message::CreateUser(CreateUserMessage::UserChanged(value)))
            .padding(8)
            .size(font_size::BODY),
    );

    let role_field = field(
        "Role",
        text_input("Optional", &state.role)
            .on_input(|value| Message::CreateUser(CreateUserMessage::RoleChanged(value)))
            .padding(8)
            .size(font_size::BODY),
    );

    let mut fields = column![customer_field, user_field, role_field].spacing(spacing::MD);

    if state.module_selection {
        let mut checklist = column![].spacing(spacing::XXS);
        for choice in &state.modules {
            let key = choice.module.module_key.clone();
            checklist = checklist.push(
                checkbox(choice.selected).label(choice.module.module_name.clone()).on_toggle(
                    move |selected| {
                        Message::CreateUser(CreateUserMessage::ModuleToggled(key.clone(), selected))
                    },
                ),
            );
        }

        fields = fields.push(
            column![text("Modules").size(font_size::SMALL), checklist].spacing(spacing::XXS),
        );
    }

    if let Some(error) = state.error.as_deref() {
        fields = fields.push(
            container(text(error).size(font_size::SMALL))
                .padding([spacing::XXS, spacing::SM])
                .width(Length::Fill)
                .style(styles::error_banner),
        );
    }

    let cancel_btn = button(text("Cancel").size(font_size::BODY).center())
        .on_press(Message::CreateUser(CreateUserMessage::Cancel))
        .style(button::secondary)
        .padding([spacing::SM, spacing::LG]);

    let submit_label = if state.submitting { "Adding..." } else { "Add User" };
    let mut submit_btn = button(text(submit_label).size(font_size::BODY).center())
        .style(button::primary)
        .padding([spacing::SM, spacing::LG]);
    if !state.submitting {
        submit_btn = submit_btn.on_press(Message::CreateUser(CreateUserMessage::Submit));
    }

    container(
        column![
            text("Add Portal User").size(font_size::TITLE),
            fields,
            row![cancel_btn, submit_btn]
                .spacing(spacing::SM)
                .align_y(Alignment::Center),
        ]
        .spacing(spacing::LG)
        .padding(spacing::XXL)
        .align_x(Alignment::Center),
    )
    .style(styles::modal_card)
    .width(400)
    .into()
}

fn field<'a>(
    label: &'a str,
    input: iced::widget::TextInput<'a, Message>,
) -> Element<'a, Message> {
    column![text(label).size(font_size::SMALL), input]
        .spacing(spacing::XXS)
        .width(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<AvailableModule> {
        vec![
            AvailableModule {
                module_key: "crm".into(),
                module_name: "CRM".into(),
            },
            AvailableModule {
                module_key: "orders".into(),
                module_name: "Orders".into(),
            },
        ]
    }

    #[test]
    fn empty_user_fails_validation() {
        let mut state = CreateUserState::new("CUST-0001".into(), true);
        assert!(state.validate().is_err());

        state.user = "   ".into();
        assert!(state.validate().is_err());

        state.user = "jane@example.com".into();
        assert!(state.validate().is_ok());
    }

    #[test]
    fn request_carries_selected_grants() {
        let mut state = CreateUserState::new("CUST-0001".into(), true);
        state.user = "jane@example.com".into();
        state.set_catalog(catalog());
        state.toggle_module("crm", true);

        let request = state.request();
        assert_eq!(request.customer, "CUST-0001");
        assert_eq!(request.user, "jane@example.com");
        assert_eq!(request.role, None);

        let modules = request.modules.expect("grant list present");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module_key, "crm");
        assert_eq!(modules[0].module_name, "CRM");
        assert!(modules[0].enabled);
    }

    #[test]
    fn request_omits_module_list_when_selection_disabled() {
        let mut state = CreateUserState::new("CUST-0001".into(), false);
        state.user = "jane@example.com".into();

        assert!(state.request().modules.is_none());
    }

    #[test]
    fn blank_role_is_omitted() {
        let mut state = CreateUserState::new("CUST-0001".into(), true);
        state.user = "jane@example.com".into();
        state.role = "  ".into();
        assert_eq!(state.request().role, None);

        state.role = "Portal Manager".into();
        assert_eq!(state.request().role.as_deref(), Some("Portal Manager"));
    }

    #[test]
    fn unknown_module_key_is_ignored() {
        let mut state = CreateUserState::new("CUST-0001".into(), true);
        state.set_catalog(catalog());
        state.toggle_module("payroll", true);

        assert!(state.modules.iter().all(|choice| !choice.selected));
    }
}
