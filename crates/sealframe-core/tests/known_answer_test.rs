//! Known-answer tests pinning the wire format, key schedule, nonce
//! construction, and the AES-GCM sealing bit-exactly, plus layout and
//! interop coverage for the CTR suites.

use sealframe_core::{CipherSuite, Context, KeyId, MAX_OVERHEAD};

const SHORT_KID: KeyId = 0x07;
const LONG_KID: KeyId = 0xffff;
const LONG_CTR: u64 = 0x0100;
const PLAINTEXT: &[u8] = &[0x00, 0x01, 0x02, 0x03];

struct GcmKnownAnswer {
    suite: CipherSuite,
    base_key: &'static str,
    short_kid_ctr0: &'static str,
    short_kid_ctr1: &'static str,
    short_kid_ctr2: &'static str,
    long_kid_short_ctr: &'static str,
    long_kid_long_ctr: &'static str,
}

const GCM_CASES: [GcmKnownAnswer; 2] = [
    GcmKnownAnswer {
        suite: CipherSuite::AesGcm128Sha256,
        base_key: "303132333435363738393a3b3c3d3e3f",
        short_kid_ctr0: "170048310f3b8c8a7297a92b3ed392938f9d0d087118",
        short_kid_ctr1: "170145c8c2cd5ef5773e38f23ee6236a623f8351cfce",
        short_kid_ctr2: "17021ea6e7b05246606050b44fe105f419dea85b4b7a",
        long_kid_short_ctr: "1affff0048310f3b542c2bc859816a10ee5f83f4f840f6e5",
        long_kid_long_ctr: "2affff0100f1f838df14b1e675fb0b0618291838e628fea346",
    },
    GcmKnownAnswer {
        suite: CipherSuite::AesGcm256Sha512,
        base_key: "404142434445464748494a4b4c4d4e4f505152535455565758595a5b5c5d5e5f",
        short_kid_ctr0: "1700b591faafe60c9c3a7d8dd1c18f91a72c510c8e63",
        short_kid_ctr1: "1701d555e665358a2486d99ac7272bedd503f53ec9d7",
        short_kid_ctr2: "170222e5fcd4709da8cc4d4a4e6e38a0b16afd0063fc",
        long_kid_short_ctr: "1affff00b591faafc843b5831c7fc08b477d926f8c4c8f9b",
        long_kid_long_ctr: "2affff01007b0e9ee905ab26c73927d7ece036a08c618610e4",
    },
];

const CTR_SUITES: [(CipherSuite, &str); 2] = [
    (CipherSuite::AesCm128HmacSha256_4, "101112131415161718191a1b1c1d1e1f"),
    (CipherSuite::AesCm128HmacSha256_8, "202122232425262728292a2b2c2d2e2f"),
];

fn all_suites() -> [(CipherSuite, &'static str); 4] {
    [
        CTR_SUITES[0],
        CTR_SUITES[1],
        (GCM_CASES[0].suite, GCM_CASES[0].base_key),
        (GCM_CASES[1].suite, GCM_CASES[1].base_key),
    ]
}

#[test]
fn gcm_protect_matches_vectors() {
    for case in &GCM_CASES {
        let base_key = hex::decode(case.base_key).unwrap();
        let mut ctx = Context::new(case.suite);
        ctx.add_key(SHORT_KID, &base_key);
        ctx.add_key(LONG_KID, &base_key);

        let mut ct_buf = vec![0u8; PLAINTEXT.len() + MAX_OVERHEAD];
        let mut pt_buf = vec![0u8; PLAINTEXT.len()];

        let ct0 = ctx.protect(SHORT_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();
        let ct1 = ctx.protect(SHORT_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();
        let ct2 = ctx.protect(SHORT_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();

        assert_eq!(hex::encode(&ct0), case.short_kid_ctr0, "{:?} ctr 0", case.suite);
        assert_eq!(hex::encode(&ct1), case.short_kid_ctr1, "{:?} ctr 1", case.suite);
        assert_eq!(hex::encode(&ct2), case.short_kid_ctr2, "{:?} ctr 2", case.suite);

        assert_eq!(ctx.unprotect(&mut pt_buf, &ct0).unwrap(), PLAINTEXT);
        assert_eq!(ctx.unprotect(&mut pt_buf, &ct1).unwrap(), PLAINTEXT);
        assert_eq!(ctx.unprotect(&mut pt_buf, &ct2).unwrap(), PLAINTEXT);

        let ct_long = ctx.protect(LONG_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();
        for _ in 1..LONG_CTR {
            ctx.protect(LONG_KID, &mut ct_buf, PLAINTEXT).unwrap();
        }
        let ct_long_ctr = ctx.protect(LONG_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();

        assert_eq!(
            hex::encode(&ct_long),
            case.long_kid_short_ctr,
            "{:?} long kid",
            case.suite
        );
        assert_eq!(
            hex::encode(&ct_long_ctr),
            case.long_kid_long_ctr,
            "{:?} long kid long ctr",
            case.suite
        );

        assert_eq!(ctx.unprotect(&mut pt_buf, &ct_long).unwrap(), PLAINTEXT);
        assert_eq!(ctx.unprotect(&mut pt_buf, &ct_long_ctr).unwrap(), PLAINTEXT);
    }
}

#[test]
fn ctr_frames_follow_the_wire_layout() {
    for (suite, base_key) in CTR_SUITES {
        let base_key = hex::decode(base_key).unwrap();
        let mut ctx = Context::new(suite);
        ctx.add_key(SHORT_KID, &base_key);
        ctx.add_key(LONG_KID, &base_key);

        let mut ct_buf = vec![0u8; PLAINTEXT.len() + MAX_OVERHEAD];
        let mut pt_buf = vec![0u8; PLAINTEXT.len()];

        for expected_header in ["1700", "1701", "1702"] {
            let frame = ctx.protect(SHORT_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();
            assert_eq!(hex::encode(&frame[..2]), expected_header, "{suite:?}");
            assert_eq!(frame.len(), 2 + PLAINTEXT.len() + suite.tag_size(), "{suite:?}");
            assert_eq!(ctx.unprotect(&mut pt_buf, &frame).unwrap(), PLAINTEXT);
        }

        let frame = ctx.protect(LONG_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();
        assert_eq!(hex::encode(&frame[..4]), "1affff00", "{suite:?}");
        assert_eq!(frame.len(), 4 + PLAINTEXT.len() + suite.tag_size(), "{suite:?}");
        for _ in 1..LONG_CTR {
            ctx.protect(LONG_KID, &mut ct_buf, PLAINTEXT).unwrap();
        }
        let frame = ctx.protect(LONG_KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();
        assert_eq!(hex::encode(&frame[..5]), "2affff0100", "{suite:?}");
        assert_eq!(frame.len(), 5 + PLAINTEXT.len() + suite.tag_size(), "{suite:?}");
        assert_eq!(ctx.unprotect(&mut pt_buf, &frame).unwrap(), PLAINTEXT);
    }
}

#[test]
fn separate_contexts_interoperate() {
    const ROUNDS: usize = 1 << 9;
    const KID: KeyId = 0x42;

    for (suite, base_key) in all_suites() {
        let base_key = hex::decode(base_key).unwrap();

        let mut send = Context::new(suite);
        send.add_key(KID, &base_key);
        let mut recv = Context::new(suite);
        recv.add_key(KID, &base_key);

        let mut ct_buf = vec![0u8; PLAINTEXT.len() + MAX_OVERHEAD];
        let mut pt_buf = vec![0u8; PLAINTEXT.len()];

        for _ in 0..ROUNDS {
            let encrypted = send.protect(KID, &mut ct_buf, PLAINTEXT).unwrap().to_vec();
            let decrypted = recv.unprotect(&mut pt_buf, &encrypted).unwrap();
            assert_eq!(decrypted, PLAINTEXT);
        }
    }
}
