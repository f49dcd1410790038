//! Mounting a fragment into a host match element without losing host actions.
//!
//! The host keeps references to the match element and to the action elements it put in
//! it (the "link" button of unlinked mentions, hover actions) and finds them again by
//! identity. The element is therefore emptied in place rather than replaced, and those
//! actions are moved back in after the mount.

use lens_config::DomSettings;
use lens_host::Element;

/// Class names of the host actions that survive a mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionClasses {
    /// The "link" action. Only the first one is kept.
    pub replace: String,
    /// Hover-revealed actions. All are kept, in document order.
    pub hover: String,
}

impl From<&DomSettings> for ActionClasses {
    fn from(dom: &DomSettings) -> Self {
        Self {
            replace: dom.replace_button_class.clone(),
            hover: dom.hover_button_class.clone(),
        }
    }
}

impl Default for ActionClasses {
    fn default() -> Self {
        Self::from(&DomSettings::default())
    }
}

/// Replaces the content of `target` with `mount`, keeping host actions.
///
/// Afterwards `target` holds the mount, then the replace action (if there was one), then
/// the hover actions. Empty class names match nothing.
pub fn mount_preserving_actions(target: &Element, mount: &Element, classes: &ActionClasses) {
    let replace = non_empty(&classes.replace).and_then(|c| target.query_selector(c));
    let hover = non_empty(&classes.hover)
        .map(|c| target.query_selector_all(c))
        .unwrap_or_default();

    target.empty();
    target.append_child(mount);
    if let Some(button) = &replace {
        target.append_child(button);
    }
    for button in &hover {
        target.append_child(button);
    }
}

/// Returns `class` unless it is blank.
fn non_empty(class: &str) -> Option<&str> {
    Some(class).filter(|c| !c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use lens_host::classes as host_classes;

    use super::*;

    fn classes() -> ActionClasses {
        ActionClasses {
            replace: "replace".into(),
            hover: "hover".into(),
        }
    }

    #[test]
    fn test_keeps_action_identity_and_order() {
        let target = Element::div();
        let hover_a = target.create_child("button", "hover");
        target.append_text("snippet");
        let replace = target.create_child("button", "replace");
        let nested = target.create_child("span", "wrapper");
        let hover_b = nested.create_child("button", "hover");

        let mount = Element::div().with_class("mount");
        mount_preserving_actions(&target, &mount, &classes());

        let children = target.children();
        assert_eq!(children.len(), 4);
        assert!(children[0].ptr_eq(&mount));
        assert!(children[1].ptr_eq(&replace));
        assert!(children[2].ptr_eq(&hover_a));
        assert!(children[3].ptr_eq(&hover_b));
        assert!(nested.parent().is_none());
        assert!(!target.text_content().contains("snippet"));
    }

    #[test]
    fn test_without_actions() {
        let target = Element::div();
        target.append_text("snippet");
        let mount = Element::div();

        mount_preserving_actions(&target, &mount, &classes());

        assert_eq!(target.child_count(), 1);
        assert!(target.children()[0].ptr_eq(&mount));
    }

    #[test]
    fn test_only_first_replace_kept() {
        let target = Element::div();
        let first = target.create_child("button", "replace");
        let _second = target.create_child("button", "replace");
        let mount = Element::div();

        mount_preserving_actions(&target, &mount, &classes());

        assert_eq!(target.child_count(), 2);
        assert!(target.children()[1].ptr_eq(&first));
    }

    #[test]
    fn test_empty_class_names_match_nothing() {
        let target = Element::div();
        target.create_child("button", "hover");
        let mount = Element::div();

        let blank = ActionClasses {
            replace: String::new(),
            hover: " ".into(),
        };
        mount_preserving_actions(&target, &mount, &blank);

        assert_eq!(target.child_count(), 1);
    }

    #[test]
    fn test_default_classes_match_host() {
        let classes = ActionClasses::default();
        assert_eq!(classes.replace, host_classes::REPLACE_BUTTON);
        assert_eq!(classes.hover, host_classes::HOVER_BUTTON);
    }
}
