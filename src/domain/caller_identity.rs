use sha2::{Digest, Sha256};

/// Synthetic account for a caller on the biometric service.
///
/// The biometric service wants an email and a password, neither of which a
/// phone call carries, so both are derived from the caller's number. The
/// derivation must stay stable: enrollment and authentication happen on
/// different webhook turns and only meet again through this identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    phone_number: String,
    surrogate_email: String,
    derived_secret: String,
}

impl CallerIdentity {
    pub fn derive(phone_number: &str, email_domain: &str) -> Self {
        let digest = Sha256::digest(phone_number.as_bytes());
        Self {
            phone_number: phone_number.to_owned(),
            surrogate_email: format!("{}@{}", phone_number, email_domain),
            derived_secret: hex::encode(digest),
        }
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn surrogate_email(&self) -> &str {
        &self.surrogate_email
    }

    pub fn derived_secret(&self) -> &str {
        &self.derived_secret
    }

    pub fn first_name(&self) -> String {
        format!("First{}", self.phone_number)
    }

    pub fn last_name(&self) -> String {
        format!("Last{}", self.phone_number)
    }
}

impl std::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.surrogate_email.fmt(f)
    }
}

#[cfg(test)]
mod tests {

    use fake::faker::phone_number::en::PhoneNumber;
    use fake::Fake;
    use quickcheck::Arbitrary;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domain::CallerIdentity;

    const DOMAIN: &str = "twiliobioauth.example.com";

    #[derive(Debug, Clone)]
    struct PhoneNumberFixture(pub String);

    impl Arbitrary for PhoneNumberFixture {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
            let number = PhoneNumber().fake_with_rng(&mut rng);

            Self(number)
        }
    }

    #[quickcheck]
    fn same_number_derives_same_identity(number: PhoneNumberFixture) -> bool {
        CallerIdentity::derive(&number.0, DOMAIN) == CallerIdentity::derive(&number.0, DOMAIN)
    }

    #[quickcheck]
    fn derived_secret_never_contains_the_number(number: PhoneNumberFixture) -> bool {
        let identity = CallerIdentity::derive(&number.0, DOMAIN);
        identity.derived_secret().len() == 64 && identity.derived_secret() != number.0
    }

    #[test]
    fn surrogate_email_is_number_at_domain() {
        let identity = CallerIdentity::derive("+15551230000", DOMAIN);
        assert_eq!(
            identity.surrogate_email(),
            "+15551230000@twiliobioauth.example.com"
        );
        assert_eq!(identity.first_name(), "First+15551230000");
        assert_eq!(identity.last_name(), "Last+15551230000");
    }

    #[test]
    fn derived_secret_is_sha256_hex() {
        // sha256("abc")
        let identity = CallerIdentity::derive("abc", DOMAIN);
        assert_eq!(
            identity.derived_secret(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn different_numbers_do_not_collide() {
        let first = CallerIdentity::derive("+15551230000", DOMAIN);
        let second = CallerIdentity::derive("+15551230001", DOMAIN);
        assert_ne!(first.derived_secret(), second.derived_secret());
    }
}
