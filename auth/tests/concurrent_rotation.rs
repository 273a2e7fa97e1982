use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use chrono::Utc;
use session_auth::InMemoryKeyRegistry;
use session_auth::KeyRegistry;
use session_auth::TokenIssuer;
use session_auth::TokenVerifier;
use session_auth::UserClaims;

const ROTATIONS: usize = 200;
const READERS: usize = 4;
const MIN_CHECKS_PER_READER: usize = 50;

#[test]
fn test_readers_never_observe_partial_rotation() {
    let registry = Arc::new(InMemoryKeyRegistry::new());
    registry.rotate().unwrap();
    let start = Arc::new(Barrier::new(READERS + 1));
    let done = Arc::new(AtomicBool::new(false));
    let checks: Arc<Vec<AtomicUsize>> =
        Arc::new((0..READERS).map(|_| AtomicUsize::new(0)).collect());

    let readers: Vec<_> = (0..READERS)
        .map(|reader| {
            let registry = Arc::clone(&registry);
            let start = Arc::clone(&start);
            let done = Arc::clone(&done);
            let checks = Arc::clone(&checks);
            thread::spawn(move || {
                start.wait();
                while !done.load(Ordering::Acquire) {
                    let current = registry.current().expect("current key must exist");
                    let resolved = registry
                        .lookup(current.id().as_str())
                        .expect("current key must be resolvable");
                    assert_eq!(resolved.id(), current.id());
                    checks[reader].fetch_add(1, Ordering::Release);
                }
            })
        })
        .collect();

    start.wait();

    // Keep rotating until every reader has checked a key while rotations were in flight.
    // A reader that stopped early has panicked; its join below reports why.
    let lagging = || {
        checks
            .iter()
            .any(|count| count.load(Ordering::Acquire) < MIN_CHECKS_PER_READER)
    };
    let mut rotations = 0;
    while rotations < ROTATIONS || (lagging() && !readers.iter().any(|r| r.is_finished())) {
        registry.rotate().unwrap();
        rotations += 1;
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    for count in checks.iter() {
        assert!(count.load(Ordering::Acquire) >= MIN_CHECKS_PER_READER);
    }
    assert_eq!(registry.len(), rotations + 1);
}

#[test]
fn test_tokens_issued_during_rotation_all_verify() {
    let registry = Arc::new(InMemoryKeyRegistry::new());
    registry.rotate().unwrap();
    let expires_at = Utc::now().timestamp() + 3600;

    let rotator = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..50 {
                registry.rotate().unwrap();
            }
        })
    };

    let issuers: Vec<_> = (1..=READERS as i64)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let issuer = TokenIssuer::new();
                (0..50)
                    .map(|n| {
                        let claims = UserClaims::new(worker * 1000 + n, expires_at);
                        let token = issuer.issue(&claims, registry.as_ref()).unwrap();
                        (claims, token)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    rotator.join().expect("rotator panicked");

    let verifier = TokenVerifier::new();
    for handle in issuers {
        for (claims, token) in handle.join().expect("issuer panicked") {
            assert_eq!(verifier.verify(&token, registry.as_ref()), Ok(claims));
        }
    }
}
