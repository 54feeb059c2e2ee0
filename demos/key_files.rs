use cryptotests::keystore::{KeyFile, KeyStore};
use cryptotests::{decrypt, encrypt, RsaPrivateKey};
use rand_core::OsRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = OsRng;
    let bits = 2048;

    let dir = std::env::temp_dir().join("cryptotests-demo");
    let store = KeyStore::new(&dir);
    {
        // Create a key pair and write all four key files
        let private_key = RsaPrivateKey::new(&mut rng, bits)?;
        store.save(&private_key)?;
    }

    // Retrieve the public key from the .xml file
    let public_key = store.load(KeyFile::PublicXml)?.public_view();
    // Retrieve the private key from the .pem file
    let private_key = store
        .load(KeyFile::PrivatePem)?
        .into_private()
        .ok_or("key-private.pem holds no private key")?;

    // Encrypt data using the public key
    let data = b"hello world";
    let enc_data = encrypt(&mut rng, &public_key, &data[..])?;
    assert_ne!(&data[..], &enc_data[..]);

    // Decrypt data using the private key
    let dec_data = decrypt(&private_key, &enc_data)?;
    assert_eq!(&data[..], &dec_data[..]);

    println!("key files in {}", dir.display());
    Ok(())
}
