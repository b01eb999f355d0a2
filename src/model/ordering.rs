use super::error::ContentError;

/// Items whose display order is stored on the item itself.
pub trait Ordered {
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
}

pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.order());
}

/// Rewrites `order` to 0..N-1 following the current slice positions.
pub fn renumber<T: Ordered>(items: &mut [T]) {
    for (position, item) in items.iter_mut().enumerate() {
        item.set_order(position as i32);
    }
}

/// Moves the item at `from` to `to`, shifting the items in between.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), ContentError> {
    let len = items.len();
    if from >= len {
        return Err(ContentError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(ContentError::IndexOutOfRange { index: to, len });
    }

    let item = items.remove(from);
    items.insert(to, item);

    Ok(())
}
