//! End-to-end PKCS#1 v1.5 encryption through generated and encoded keys.

use cryptotests::{
    decode_pem, decrypt, decrypt_blinded, encode_pem, encrypt, from_xml, generate_keypair,
    math::mod_pow, to_xml, Error, PublicKeyParts, RsaKeyParameters, RsaPrivateKey, RsaPublicKey,
};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

const MESSAGE: &[u8] = b"Test Message!";

fn key_2048() -> RsaPrivateKey {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    generate_keypair(&mut rng, 2048).unwrap()
}

#[test]
fn test_message_round_trip_2048() {
    let mut rng = ChaCha8Rng::from_seed([1; 32]);
    let private_key = key_2048();
    let public_key = RsaPublicKey::from(&private_key);

    assert_eq!(private_key.n().bits(), 2048);
    assert_eq!(private_key.size(), 256);

    let ciphertext = encrypt(&mut rng, &public_key, MESSAGE).unwrap();
    assert_eq!(ciphertext.len(), 256);
    assert_eq!(decrypt(&private_key, &ciphertext).unwrap(), MESSAGE);
    assert_eq!(
        decrypt_blinded(&mut rng, &private_key, &ciphertext).unwrap(),
        MESSAGE
    );
}

#[test]
fn test_capacity_2048() {
    let mut rng = ChaCha8Rng::from_seed([2; 32]);
    let private_key = key_2048();
    let public_key = private_key.public_view();

    let longest = vec![0x5a; 245];
    let ciphertext = encrypt(&mut rng, &public_key, &longest).unwrap();
    assert_eq!(decrypt(&private_key, &ciphertext).unwrap(), longest);

    assert!(matches!(
        encrypt(&mut rng, &public_key, &[0x5a; 246]),
        Err(Error::MessageTooLong)
    ));

    let ciphertext = encrypt(&mut rng, &public_key, &[]).unwrap();
    assert_eq!(decrypt(&private_key, &ciphertext).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_cross_encoding() {
    let mut rng = ChaCha8Rng::from_seed([3; 32]);
    let private_key = key_2048();

    let private_pem = encode_pem(&private_key.clone().into());
    let public_pem = encode_pem(&private_key.public_view().into());
    let private_xml = to_xml(&private_key.clone().into()).unwrap();
    let public_xml = to_xml(&private_key.public_view().into()).unwrap();

    // encrypt with the XML public key, decrypt with the PEM private key
    let public_key = from_xml(&public_xml).unwrap().public_view();
    let ciphertext = encrypt(&mut rng, &public_key, MESSAGE).unwrap();
    let pem_private = decode_pem(&private_pem).unwrap().into_private().unwrap();
    assert_eq!(decrypt(&pem_private, &ciphertext).unwrap(), MESSAGE);

    // and the other way around
    let public_key = decode_pem(&public_pem).unwrap().public_view();
    let ciphertext = encrypt(&mut rng, &public_key, MESSAGE).unwrap();
    let xml_private = from_xml(&private_xml).unwrap().into_private().unwrap();
    assert_eq!(decrypt(&xml_private, &ciphertext).unwrap(), MESSAGE);

    assert_eq!(pem_private, xml_private);
    assert_eq!(pem_private, private_key);
}

#[test]
fn test_invalid_padding() {
    let private_key = key_2048();
    let k = private_key.size();

    // a block that decrypts to 00 01 ..., i.e. not an encryption block
    let mut em = vec![0xff; k];
    em[0] = 0x00;
    em[1] = 0x01;
    em[k - 14] = 0x00;
    let c = mod_pow(
        &cryptotests::BigUint::from_bytes_be(&em),
        private_key.e(),
        private_key.n(),
    );
    let mut ciphertext = vec![0u8; k];
    let bytes = c.to_bytes_be();
    ciphertext[k - bytes.len()..].copy_from_slice(&bytes);

    assert!(matches!(
        decrypt(&private_key, &ciphertext),
        Err(Error::InvalidPadding)
    ));
}

#[test]
fn test_ciphertext_out_of_range() {
    let mut rng = ChaCha8Rng::from_seed([4; 32]);
    let private_key = key_2048();

    let n = private_key.n().to_bytes_be();
    assert!(matches!(
        decrypt(&private_key, &n),
        Err(Error::CiphertextOutOfRange)
    ));

    let ciphertext = encrypt(&mut rng, &private_key.public_view(), MESSAGE).unwrap();
    assert!(matches!(
        decrypt(&private_key, &ciphertext[1..]),
        Err(Error::CiphertextOutOfRange)
    ));

    let mut longer = vec![0u8];
    longer.extend_from_slice(&ciphertext);
    assert!(matches!(
        decrypt(&private_key, &longer),
        Err(Error::CiphertextOutOfRange)
    ));
}

#[test]
fn test_public_pem_decrypt_is_impossible() {
    let private_key = key_2048();
    let params = decode_pem(&encode_pem(&private_key.public_view().into())).unwrap();
    assert!(matches!(params, RsaKeyParameters::Public(_)));
    assert_eq!(params.into_private(), None);
}
