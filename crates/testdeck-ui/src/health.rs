//! Health indicator in `#health-status`.

use testdeck_client::HealthState;

use crate::markup::icon;
use crate::page::Document;

/// Id of the health indicator element.
pub const HEALTH_STATUS_ID: &str = "health-status";

/// Indicator markup for a health state.
pub fn health_html(state: HealthState) -> String {
    let (colour, label) = match state {
        HealthState::Healthy => ("text-success", "系统正常"),
        HealthState::Unhealthy => ("text-danger", "系统异常"),
        HealthState::Unreachable => ("text-warning", "连接失败"),
    };
    format!("{} {label}", icon("bi-circle-fill", colour))
}

/// Write `state` into `#health-status`. Returns `false` if the page has no
/// indicator.
pub fn render_health<D: Document + ?Sized>(doc: &mut D, state: HealthState) -> bool {
    match doc.element_mut(HEALTH_STATUS_ID) {
        Some(el) => {
            el.set_inner_html(health_html(state));
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Element, Page};

    #[test]
    fn renders_each_state() {
        let mut page = Page::new().with(Element::new("span").with_id(HEALTH_STATUS_ID));

        render_health(&mut page, HealthState::Healthy);
        assert_eq!(
            page.inner_html(HEALTH_STATUS_ID).unwrap(),
            r#"<i class="bi bi-circle-fill text-success"></i> 系统正常"#
        );

        render_health(&mut page, HealthState::Unhealthy);
        assert_eq!(
            page.inner_html(HEALTH_STATUS_ID).unwrap(),
            r#"<i class="bi bi-circle-fill text-danger"></i> 系统异常"#
        );

        render_health(&mut page, HealthState::Unreachable);
        assert_eq!(
            page.inner_html(HEALTH_STATUS_ID).unwrap(),
            r#"<i class="bi bi-circle-fill text-warning"></i> 连接失败"#
        );
    }

    #[test]
    fn page_without_indicator_is_untouched() {
        let mut page = Page::new();
        assert!(!render_health(&mut page, HealthState::Healthy));
        assert_eq!(page, Page::new());
    }
}
