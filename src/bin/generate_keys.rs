use domain::jwt::generate_hex_key_pair;

/// Generates a fresh Ed25519 keypair and prints the hex-encoded values
/// suitable for the AUTH_PRIVATE_KEY / AUTH_PUBLIC_KEY settings.
fn main() {
    let (private_hex, public_hex) = generate_hex_key_pair();

    println!("AUTH_PRIVATE_KEY={private_hex}");
    println!("AUTH_PUBLIC_KEY={public_hex}");
}
