use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use ntru_core::*;

fn within(limit: Duration, body: impl FnOnce() + Send + 'static) {
    let (done, finished) = mpsc::channel();
    thread::spawn(move || {
        body();
        let _ = done.send(());
    });
    finished
        .recv_timeout(limit)
        .expect("default source use did not finish");
}

// Single test: the default source is process-wide state.
#[test]
fn default_source_can_be_used_from_inside_itself() {
    let engine = ntru_testkit::install();

    within(Duration::from_secs(10), move || {
        let (public_key, private_key) =
            create_keys(None, KeyType::Product, 128).unwrap().into_parts();

        let outer = with_default_source(|source| {
            let ciphertext = public_key.encrypt(b"nested", None)?;
            let inner = with_default_source(|inner| Ok(inner.handle()))?;
            assert_eq!(inner, source.handle());
            let pair = create_keys(None, KeyType::Size, 112)?;
            assert_eq!(pair.public_key().params(), EncryptParamSet::Ees401Ep1);
            Ok((source.handle(), ciphertext))
        });
        let (handle, ciphertext) = outer.unwrap();
        assert_eq!(private_key.decrypt(&ciphertext).unwrap(), b"nested");

        let busy = with_default_source(|_| release_default_source());
        assert_eq!(busy, Err(NtruError::DefaultSourceBusy));
        assert!(engine.is_live(handle));

        release_default_source().unwrap();
        assert!(!engine.is_live(handle));
        assert_eq!(engine.releases(handle), 1);
        assert_eq!(engine.invalid_releases(), 0);
    });
}
