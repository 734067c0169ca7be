use std::cmp::Ordering;
use std::fmt;

type Id = u32;
const NIL: Id = Id::MAX;

const LEFT: usize = 0;
const RIGHT: usize = 1;

#[inline(always)]
fn idx(x: Id) -> usize {
    x as usize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug)]
struct Node<K> {
    ch: [Id; 2],
    p: Id,
    color: Color,
    key: K,
}

impl<K> Node<K> {
    fn new(key: K, p: Id) -> Self {
        // New nodes start red: attaching a red leaf never changes any
        // black-height, so only a red-red edge can need repair.
        Self {
            ch: [NIL, NIL],
            p,
            color: Color::Red,
            key,
        }
    }
}

#[derive(Debug)]
enum Slot<K> {
    Occupied(Node<K>),
    Vacant,
}

/// Ordered set of unique keys backed by a red-black tree.
///
/// Nodes live in an index arena; child links are `u32` handles and the
/// parent backlink is non-owning, so rebalancing walks upward without any
/// recursion. `insert`, `remove` and `get` are O(log n) worst case;
/// `iter` yields keys in ascending order in O(1) extra space.
pub struct RbTree<K: Ord> {
    slots: Vec<Slot<K>>,
    free: Vec<Id>,
    root: Id,
    len: usize,
}

impl<K: Ord> RbTree<K> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NIL,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Releases every node and resets to the empty tree.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = NIL;
        self.len = 0;
    }

    #[inline(always)]
    fn node(&self, x: Id) -> &Node<K> {
        debug_assert!(x != NIL);
        match &self.slots[idx(x)] {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("live handle pointing at a vacant slot"),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, x: Id) -> &mut Node<K> {
        debug_assert!(x != NIL);
        match &mut self.slots[idx(x)] {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("live handle pointing at a vacant slot"),
        }
    }

    /// Absent children count as black.
    #[inline(always)]
    fn color(&self, x: Id) -> Color {
        if x == NIL { Color::Black } else { self.node(x).color }
    }

    #[inline(always)]
    fn is_red(&self, x: Id) -> bool {
        self.color(x) == Color::Red
    }

    /// Which side of its parent `x` hangs on. Requires a parent.
    #[inline(always)]
    fn dir_of(&self, x: Id) -> usize {
        let p = self.node(x).p;
        debug_assert!(p != NIL);
        usize::from(self.node(p).ch[RIGHT] == x)
    }

    fn alloc(&mut self, key: K, p: Id) -> Id {
        let node = Node::new(key, p);
        if let Some(id) = self.free.pop() {
            debug_assert!(matches!(self.slots[idx(id)], Slot::Vacant));
            self.slots[idx(id)] = Slot::Occupied(node);
            id
        } else {
            debug_assert!(self.slots.len() < NIL as usize);
            let id = self.slots.len() as Id;
            self.slots.push(Slot::Occupied(node));
            id
        }
    }

    fn release(&mut self, x: Id) -> Node<K> {
        let slot = std::mem::replace(&mut self.slots[idx(x)], Slot::Vacant);
        self.free.push(x);
        match slot {
            Slot::Occupied(node) => node,
            Slot::Vacant => unreachable!("releasing a slot that was already vacant"),
        }
    }

    /// Iterative descent. On a hit returns `(true, node)`; on a miss returns
    /// `(false, last node visited)` so `insert` can attach right there.
    fn locate(&self, key: &K) -> (bool, Id) {
        let mut cur = self.root;
        let mut last = NIL;
        while cur != NIL {
            last = cur;
            match key.cmp(&self.node(cur).key) {
                Ordering::Less => cur = self.node(cur).ch[LEFT],
                Ordering::Greater => cur = self.node(cur).ch[RIGHT],
                Ordering::Equal => return (true, cur),
            }
        }
        (false, last)
    }

    pub fn get(&self, key: &K) -> Option<&K> {
        let (found, locus) = self.locate(key);
        if found { Some(&self.node(locus).key) } else { None }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.locate(key).0
    }

    /// Rotates `x` toward direction `d`, promoting its `d ^ 1` child.
    /// Purely structural: repoints the local links, rebases the subtree
    /// under `x`'s old parent (or the root), and never touches colors.
    /// The promoted child must exist; the fix-up procedures only request
    /// rotations where it does.
    fn rotate(&mut self, x: Id, d: usize) {
        let y = self.node(x).ch[d ^ 1];
        if y == NIL {
            debug_assert!(false, "rotation with no child to promote");
            return;
        }
        let p = self.node(x).p;
        let mid = self.node(y).ch[d];

        self.node_mut(x).ch[d ^ 1] = mid;
        if mid != NIL {
            self.node_mut(mid).p = x;
        }

        self.node_mut(y).p = p;
        if p == NIL {
            self.root = y;
        } else if self.node(p).ch[LEFT] == x {
            self.node_mut(p).ch[LEFT] = y;
        } else {
            self.node_mut(p).ch[RIGHT] = y;
        }

        self.node_mut(y).ch[d] = x;
        self.node_mut(x).p = y;
    }

    /// Inserts `key`, returning false without mutation if already present.
    pub fn insert(&mut self, key: K) -> bool {
        let (found, locus) = self.locate(&key);
        if found {
            return false;
        }
        let id = if locus == NIL {
            let id = self.alloc(key, NIL);
            self.root = id;
            id
        } else {
            let d = if key < self.node(locus).key { LEFT } else { RIGHT };
            let id = self.alloc(key, locus);
            self.node_mut(locus).ch[d] = id;
            id
        };
        self.len += 1;
        self.insert_fixup(id);
        true
    }

    /// Repairs a possible red-red edge above a freshly attached red node,
    /// walking upward until the violation is absorbed.
    fn insert_fixup(&mut self, mut x: Id) {
        loop {
            let p = self.node(x).p;
            if p == NIL {
                // The repair reached the top; the root is always black.
                self.node_mut(x).color = Color::Black;
                return;
            }
            if self.node(p).color == Color::Black {
                return;
            }

            // A red parent is never the root, so a grandparent exists.
            let g = self.node(p).p;
            let pd = self.dir_of(p);
            let uncle = self.node(g).ch[pd ^ 1];
            if self.is_red(uncle) {
                // Red uncle: recolor one level and push the violation up.
                self.node_mut(p).color = Color::Black;
                self.node_mut(uncle).color = Color::Black;
                self.node_mut(g).color = Color::Red;
                x = g;
                continue;
            }

            if self.dir_of(x) != pd {
                // Zig-zag: straighten it, then continue from the bottom of
                // the now single-direction chain (the former parent).
                self.rotate(p, pd);
                x = p;
            }

            let p = self.node(x).p;
            let g = self.node(p).p;
            self.node_mut(p).color = Color::Black;
            self.node_mut(g).color = Color::Red;
            self.rotate(g, pd ^ 1);
            return;
        }
    }

    /// Removes `key`, returning false without mutation if absent.
    pub fn remove(&mut self, key: &K) -> bool {
        let (found, target) = self.locate(key);
        if !found {
            return false;
        }
        self.remove_at(target);
        true
    }

    fn remove_at(&mut self, target: Id) {
        // A two-child target is not unlinked itself: its in-order
        // predecessor (rightmost node of the left subtree, at most one
        // child) is spliced out instead and its key migrates into the
        // target's position.
        let mut victim = target;
        if self.node(target).ch[LEFT] != NIL && self.node(target).ch[RIGHT] != NIL {
            let mut cur = self.node(target).ch[LEFT];
            while self.node(cur).ch[RIGHT] != NIL {
                cur = self.node(cur).ch[RIGHT];
            }
            victim = cur;
        }

        let vnode = self.node(victim);
        let replacement = if vnode.ch[LEFT] != NIL {
            vnode.ch[LEFT]
        } else {
            vnode.ch[RIGHT]
        };
        let vparent = vnode.p;
        let vcolor = vnode.color;
        let vdir = if vparent == NIL { LEFT } else { self.dir_of(victim) };

        if replacement != NIL {
            self.node_mut(replacement).p = vparent;
        }
        if vparent == NIL {
            self.root = replacement;
        } else {
            self.node_mut(vparent).ch[vdir] = replacement;
        }

        let unlinked = self.release(victim);
        if victim != target {
            self.node_mut(target).key = unlinked.key;
        }
        self.len -= 1;

        // Unlinking a red node keeps every black count intact. A black
        // victim with a red replacement absorbs the deficit by recoloring;
        // otherwise the spliced position is one black short and the fix-up
        // runs on it.
        match vcolor {
            Color::Red => {}
            Color::Black if replacement != NIL && self.is_red(replacement) => {
                self.node_mut(replacement).color = Color::Black;
            }
            Color::Black => self.delete_fixup(vparent, vdir),
        }
    }

    /// Restores black-height uniformity after a black node was spliced out.
    /// The deficient position is the (possibly absent) `dir` child of
    /// `parent`; the dispatch walks upward until the deficit is absorbed.
    fn delete_fixup(&mut self, mut parent: Id, mut dir: usize) {
        loop {
            if parent == NIL {
                // The deficit reached the root: every path lost one black
                // node, so black-height is uniform again.
                return;
            }
            let sib = self.node(parent).ch[dir ^ 1];
            debug_assert!(sib != NIL, "sibling of a deficient position exists");
            if self.is_red(sib) {
                // Red sibling: lift it above the parent and retry against
                // the new black sibling, now under a red parent.
                self.node_mut(sib).color = Color::Black;
                self.node_mut(parent).color = Color::Red;
                self.rotate(parent, dir);
                continue;
            }

            let near = self.node(sib).ch[dir];
            let far = self.node(sib).ch[dir ^ 1];
            if !self.is_red(near) && !self.is_red(far) {
                self.node_mut(sib).color = Color::Red;
                if self.is_red(parent) {
                    // Recoloring the parent black restores the missing
                    // black level on the deficient side.
                    self.node_mut(parent).color = Color::Black;
                    return;
                }
                // Black parent: the whole subtree is now one black short,
                // so the deficit moves up a level.
                let up = self.node(parent).p;
                if up != NIL {
                    dir = self.dir_of(parent);
                }
                parent = up;
                continue;
            }

            if !self.is_red(far) {
                // Near nephew red, far nephew black: rotate the sibling
                // away from the deficient side to expose a red far nephew.
                self.node_mut(sib).color = Color::Red;
                self.node_mut(near).color = Color::Black;
                self.rotate(sib, dir ^ 1);
                continue;
            }

            // Red far nephew: the sibling takes over the parent's color and
            // position, and one black from each of parent and far nephew
            // settles the deficit.
            self.node_mut(sib).color = self.node(parent).color;
            self.node_mut(parent).color = Color::Black;
            self.node_mut(far).color = Color::Black;
            self.rotate(parent, dir);
            return;
        }
    }

    fn leftmost(&self, mut x: Id) -> Id {
        while self.node(x).ch[LEFT] != NIL {
            x = self.node(x).ch[LEFT];
        }
        x
    }

    fn successor(&self, x: Id) -> Id {
        let right = self.node(x).ch[RIGHT];
        if right != NIL {
            return self.leftmost(right);
        }
        let mut cur = x;
        let mut p = self.node(cur).p;
        while p != NIL && self.node(p).ch[RIGHT] == cur {
            cur = p;
            p = self.node(cur).p;
        }
        p
    }

    /// In-order (ascending) traversal. Restartable and non-mutating; walks
    /// the parent links instead of keeping a stack.
    pub fn iter(&self) -> Iter<'_, K> {
        let first = if self.root == NIL {
            NIL
        } else {
            self.leftmost(self.root)
        };
        Iter {
            tree: self,
            next: first,
            remaining: self.len,
        }
    }
}

impl<K: Ord> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Extend<K> for RbTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for RbTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for RbTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, K: Ord> {
    tree: &'a RbTree<K>,
    next: Id,
    remaining: usize,
}

impl<'a, K: Ord> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NIL {
            return None;
        }
        let current = self.next;
        self.next = self.tree.successor(current);
        self.remaining -= 1;
        Some(&self.tree.node(current).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K: Ord> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<K: Ord> RbTree<K> {
    /// Asserts every structural invariant: black root, no red-red edge,
    /// uniform black-height, consistent parent links, strictly ascending
    /// in-order sequence, and bookkeeping agreement between `len`, the
    /// arena and the free list.
    pub(crate) fn audit(&self) {
        assert_eq!(self.color(self.root), Color::Black, "root must be black");
        let mut live = 0_usize;
        if self.root != NIL {
            assert_eq!(self.node(self.root).p, NIL, "root has no parent");
            self.audit_subtree(self.root, &mut live);
        }
        assert_eq!(live, self.len, "len matches reachable node count");
        assert_eq!(
            self.len + self.free.len(),
            self.slots.len(),
            "every slot is either live or free-listed"
        );
        for &id in &self.free {
            assert!(matches!(self.slots[idx(id)], Slot::Vacant));
        }

        let keys: Vec<&K> = self.iter().collect();
        assert_eq!(keys.len(), self.len);
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "in-order keys strictly ascending");
        }
    }

    /// Returns the black-height of the subtree, counting the absent-child
    /// positions as one black node each.
    fn audit_subtree(&self, x: Id, live: &mut usize) -> usize {
        if x == NIL {
            return 1;
        }
        *live += 1;
        let node = self.node(x);
        if node.color == Color::Red {
            assert_eq!(self.color(node.ch[LEFT]), Color::Black, "no red-red edge");
            assert_eq!(self.color(node.ch[RIGHT]), Color::Black, "no red-red edge");
        }
        for d in [LEFT, RIGHT] {
            let c = node.ch[d];
            if c != NIL {
                assert_eq!(self.node(c).p, x, "child points back to its parent");
            }
        }
        let left_bh = self.audit_subtree(node.ch[LEFT], live);
        let right_bh = self.audit_subtree(node.ch[RIGHT], live);
        assert_eq!(left_bh, right_bh, "black-height uniform across children");
        left_bh + usize::from(node.color == Color::Black)
    }
}
