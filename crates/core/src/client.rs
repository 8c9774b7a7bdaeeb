//! Client classification and contact preference vocabularies.

define_vocabulary! {
    /// Client classification. Clients created implicitly by the directory
    /// are [`ClientType::Individual`].
    ClientType ("client type") {
        Individual = "individual",
        Business = "business",
        Government = "government",
        Ngo = "ngo",
    }
}

impl Default for ClientType {
    fn default() -> Self {
        Self::Individual
    }
}

define_vocabulary! {
    /// How the client prefers to be reached.
    ContactMethod ("contact method") {
        Phone = "phone",
        Email = "email",
        Whatsapp = "whatsapp",
    }
}

impl Default for ContactMethod {
    fn default() -> Self {
        Self::Phone
    }
}
