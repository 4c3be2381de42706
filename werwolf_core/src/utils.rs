/// Turns a display name into a catalogue identifier: everything but ASCII
/// word characters is dropped and the rest is lower-cased.
pub fn derive_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub trait VecExtensions<T> {
    fn remove_first_where<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool;

    fn push_unique(&mut self, item: T) -> bool
    where
        T: PartialEq;

    fn toggle(&mut self, item: T)
    where
        T: PartialEq;
}

impl<T> VecExtensions<T> for Vec<T> {
    fn remove_first_where<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.iter()
            .position(predicate)
            .map(|index| self.remove(index))
    }

    fn push_unique(&mut self, item: T) -> bool
    where
        T: PartialEq,
    {
        if self.contains(&item) {
            return false;
        }
        self.push(item);
        true
    }

    fn toggle(&mut self, item: T)
    where
        T: PartialEq,
    {
        if self.remove_first_where(|i| *i == item).is_none() {
            self.push(item);
        }
    }
}
