/// Optional human-readable labels for item-index codes
/// (e.g. lab-test code 50912 -> "Creatinine").
pub trait IItemDictionary: Send + Sync {
    fn lookup(&self, entity: &str, item_code: &str) -> Option<String>;
}
