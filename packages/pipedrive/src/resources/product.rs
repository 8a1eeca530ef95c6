use super::{related, User};

resource! {
    /// A product. Served by the V2 API.
    Product => Product
}

impl Product {
    pub fn owner(&self) -> Option<User> {
        related(self, "owner")
    }

    pub fn user(&self) -> Option<User> {
        related(self, "user")
    }

    /// V1's `active_flag`: the negation of `is_deleted`.
    pub fn active_flag(&self) -> Option<bool> {
        self.get_bool("active_flag")
    }

    /// V1's `selectable`: V2's `is_linkable`.
    pub fn selectable(&self) -> Option<bool> {
        self.get_bool("selectable")
    }
}
