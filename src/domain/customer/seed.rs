use super::entity::Customer;

/// The fixed dataset the repository is reset to
pub fn seed_customers() -> Vec<Customer> {
    vec![
        Customer::new(0, "Alice", "alice@abc.com", "apple"),
        Customer::new(1, "Bob", "bob@abc.com", "banana"),
        Customer::new(2, "Carol", "carol@abc.com", "cherry"),
    ]
}
