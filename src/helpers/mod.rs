pub mod event_heap;
