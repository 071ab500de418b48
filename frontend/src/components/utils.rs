use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

/// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn is_image_type(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// The first file of a drop/selection, if it is an image; a leading
/// non-image file makes the whole gesture a no-op.
pub fn first_image_file(file_list: &FileList) -> Option<web_sys::File> {
    file_list
        .item(0)
        .filter(|file| is_image_type(&file.type_()))
}

/// Base64 payload of a data URL, the part after the comma separator.
/// A payload-less URL such as `"data:,"` (what a 0x0 canvas encodes
/// to) yields `None`.
pub fn split_data_url(data_url: &str) -> Option<&str> {
    data_url
        .split_once(',')
        .map(|(_, base64)| base64)
        .filter(|base64| !base64.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_data_url_takes_the_part_after_the_comma() {
        assert_eq!(
            split_data_url("data:image/png;base64,iVBORw0KGgo"),
            Some("iVBORw0KGgo")
        );
        assert_eq!(split_data_url("no separator here"), None);
    }

    #[test]
    fn empty_data_url_payload_is_rejected() {
        assert_eq!(split_data_url("data:,"), None);
        assert_eq!(split_data_url("data:image/jpeg;base64,"), None);
    }

    #[test]
    fn only_image_mime_types_pass_the_filter() {
        assert!(is_image_type("image/jpeg"));
        assert!(is_image_type("image/webp"));
        assert!(!is_image_type("application/pdf"));
        assert!(!is_image_type("text/plain"));
        assert!(!is_image_type(""));
    }
}
